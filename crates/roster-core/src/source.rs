//! Roster sources
//!
//! The engine never talks to a database. Templates, staff and availability
//! arrive through [`RosterSource`], so a real store can replace the
//! in-memory one without touching the solver.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::time::{parse_time, weekday_from_iso};
use crate::wire::{ExceptionDto, WindowDto};
use crate::{
    AvailabilityException, AvailabilityWindow, ShiftBlock, ShiftTemplate, SourceError, StaffId,
    StaffMember, ValidationError, VenueId,
};

/// Availability for one staff member, stored apart from the roster itself
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub staff_id: StaffId,
    pub weekly: Vec<AvailabilityWindow>,
    pub exceptions: Vec<AvailabilityException>,
}

/// Read access to a venue's configuration
pub trait RosterSource {
    /// Display name of the venue
    fn venue_name(&self, venue_id: &str) -> Result<String, SourceError>;

    /// Weekday templates of the venue
    fn templates(&self, venue_id: &str) -> Result<Vec<ShiftTemplate>, SourceError>;

    /// Staff members who may work at the venue
    fn staff(&self, venue_id: &str) -> Result<Vec<StaffMember>, SourceError>;

    /// Availability records of the venue's staff
    fn availability(&self, venue_id: &str) -> Result<Vec<AvailabilityRecord>, SourceError>;
}

/// Fold availability records into the staff they belong to.
///
/// Records for unknown staff are dropped; the returned warnings name them.
pub fn merge_availability(
    mut staff: Vec<StaffMember>,
    records: Vec<AvailabilityRecord>,
) -> (Vec<StaffMember>, Vec<String>) {
    let index: HashMap<StaffId, usize> = staff
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), i))
        .collect();

    let mut warnings = Vec::new();
    for record in records {
        match index.get(&record.staff_id) {
            Some(&i) => {
                staff[i].weekly.extend(record.weekly);
                staff[i].exceptions.extend(record.exceptions);
            }
            None => warnings.push(format!(
                "availability for unknown staff '{}' ignored",
                record.staff_id
            )),
        }
    }
    (staff, warnings)
}

// ============================================================================
// In-memory source
// ============================================================================

/// Everything stored for one venue
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VenueData {
    pub name: String,
    pub templates: Vec<ShiftTemplate>,
    pub staff: Vec<StaffMember>,
    pub availability: Vec<AvailabilityRecord>,
}

/// Source backed by maps, loadable from a JSON store file
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    venues: HashMap<VenueId, VenueData>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a venue
    pub fn with_venue(mut self, venue_id: impl Into<String>, data: VenueData) -> Self {
        self.venues.insert(venue_id.into(), data);
        self
    }

    pub fn venue(&self, venue_id: &str) -> Result<&VenueData, SourceError> {
        self.venues
            .get(venue_id)
            .ok_or_else(|| SourceError::VenueNotFound(venue_id.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let store: StoreFile = serde_json::from_str(json)?;
        let mut source = Self::new();
        for venue in store.venues {
            let id = venue.id.clone();
            source.venues.insert(id, venue.into_data()?);
        }
        Ok(source)
    }

    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl RosterSource for InMemorySource {
    fn venue_name(&self, venue_id: &str) -> Result<String, SourceError> {
        Ok(self.venue(venue_id)?.name.clone())
    }

    fn templates(&self, venue_id: &str) -> Result<Vec<ShiftTemplate>, SourceError> {
        Ok(self.venue(venue_id)?.templates.clone())
    }

    fn staff(&self, venue_id: &str) -> Result<Vec<StaffMember>, SourceError> {
        Ok(self.venue(venue_id)?.staff.clone())
    }

    fn availability(&self, venue_id: &str) -> Result<Vec<AvailabilityRecord>, SourceError> {
        Ok(self.venue(venue_id)?.availability.clone())
    }
}

// ============================================================================
// Store file format
// ============================================================================

#[derive(Debug, Deserialize)]
struct StoreFile {
    #[serde(default)]
    venues: Vec<VenueDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VenueDto {
    id: VenueId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    templates: Vec<TemplateDto>,
    #[serde(default)]
    staff: Vec<StoredStaffDto>,
    #[serde(default)]
    availability: Vec<AvailabilityDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDto {
    /// 1 = Monday .. 7 = Sunday
    weekday: i64,
    #[serde(default)]
    shift_blocks: Vec<BlockDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockDto {
    start: String,
    end: String,
    role: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredStaffDto {
    id: StaffId,
    name: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default = "default_active")]
    active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityDto {
    staff_id: StaffId,
    #[serde(default)]
    weekly: Vec<WindowDto>,
    #[serde(default)]
    exceptions: Vec<ExceptionDto>,
}

fn default_active() -> bool {
    true
}

impl VenueDto {
    fn into_data(self) -> Result<VenueData, ValidationError> {
        let venue = self.id;
        let mut templates = Vec::with_capacity(self.templates.len());
        for (t, template) in self.templates.iter().enumerate() {
            let field = format!("venues[{venue}].templates[{t}]");
            let mut out =
                ShiftTemplate::new(weekday_from_iso(&format!("{field}.weekday"), template.weekday)?);
            for (b, block) in template.shift_blocks.iter().enumerate() {
                let field = format!("{field}.shiftBlocks[{b}]");
                if block.count == 0 {
                    return Err(ValidationError::ZeroHeadcount { field });
                }
                out = out.block(
                    ShiftBlock::new(
                        parse_time(&format!("{field}.start"), &block.start)?,
                        parse_time(&format!("{field}.end"), &block.end)?,
                        block.role.clone(),
                    )
                    .count(block.count),
                );
            }
            templates.push(out);
        }

        let staff = self
            .staff
            .into_iter()
            .map(|s| {
                let mut member = StaffMember::new(s.id).name(s.name).roles(s.roles);
                member.active = s.active;
                member
            })
            .collect();

        let mut availability = Vec::with_capacity(self.availability.len());
        for (a, record) in self.availability.iter().enumerate() {
            let field = format!("venues[{venue}].availability[{a}]");
            let weekly = record
                .weekly
                .iter()
                .enumerate()
                .map(|(i, w)| w.to_window(&format!("{field}.weekly[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            let exceptions = record
                .exceptions
                .iter()
                .enumerate()
                .map(|(i, e)| e.to_exception(&format!("{field}.exceptions[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            availability.push(AvailabilityRecord {
                staff_id: record.staff_id.clone(),
                weekly,
                exceptions,
            });
        }

        Ok(VenueData {
            name: self.name,
            templates,
            staff,
            availability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const STORE: &str = r#"{
        "venues": [{
            "id": "bistro",
            "name": "Bistro",
            "templates": [
                { "weekday": 1, "shiftBlocks": [
                    { "start": "09:00", "end": "17:00", "role": "chef", "count": 2 }
                ] }
            ],
            "staff": [ { "id": "ana", "name": "Ana", "roles": ["chef"] } ],
            "availability": [
                { "staffId": "ana", "weekly": [ { "weekday": 1, "start": "08:00", "end": "18:00" } ] },
                { "staffId": "ghost", "weekly": [] }
            ]
        }]
    }"#;

    #[test]
    fn loads_store_file() {
        let source = InMemorySource::from_json_str(STORE).unwrap();
        let templates = source.templates("bistro").unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].weekday, Weekday::Mon);
        assert_eq!(templates[0].blocks[0].count, 2);
        assert_eq!(source.venue_name("bistro").unwrap(), "Bistro");
        assert_eq!(source.staff("bistro").unwrap()[0].name, "Ana");
        assert_eq!(source.availability("bistro").unwrap().len(), 2);
    }

    #[test]
    fn unknown_venue_is_an_error() {
        let source = InMemorySource::from_json_str(STORE).unwrap();
        assert!(matches!(
            source.templates("diner"),
            Err(SourceError::VenueNotFound(v)) if v == "diner"
        ));
    }

    #[test]
    fn store_weekday_zero_is_rejected() {
        let store = STORE.replace("\"weekday\": 1, \"shiftBlocks\"", "\"weekday\": 0, \"shiftBlocks\"");
        let err = InMemorySource::from_json_str(&store).unwrap_err();
        assert!(err.to_string().contains("venues[bistro].templates[0].weekday"));
    }

    #[test]
    fn merge_attaches_records_and_reports_strays() {
        let source = InMemorySource::from_json_str(STORE).unwrap();
        let (staff, warnings) = merge_availability(
            source.staff("bistro").unwrap(),
            source.availability("bistro").unwrap(),
        );
        assert_eq!(staff[0].weekly.len(), 1);
        assert_eq!(
            warnings,
            vec!["availability for unknown staff 'ghost' ignored".to_string()]
        );
    }
}
