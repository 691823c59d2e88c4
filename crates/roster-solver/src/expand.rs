//! Shift slot expansion
//!
//! Turns a venue's weekday templates into the dated slots of one week.
//! Slot ids are derived from the slot itself, so regenerating the same week
//! yields the same ids and previously approved assignments still line up.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use std::collections::HashMap;

use roster_core::time::{check_interval, format_time};
use roster_core::{RoleId, ShiftSlot, ShiftTemplate, ValidationError};

/// Build the slot id for the `ordinal`-th slot of a block
pub fn slot_id(venue_id: &str, date: NaiveDate, start: NaiveTime, role: &str, ordinal: u32) -> String {
    format!(
        "{}_{}_{}_{}_{}",
        venue_id,
        date.format("%Y%m%d"),
        format_time(start),
        role,
        ordinal
    )
}

/// Expand templates into the slots of the week starting on `week_start`.
///
/// `week_start` must be a Monday. Blocks with the same date, start and role
/// share one ordinal sequence, so ids stay unique when a template repeats a
/// block.
pub fn expand_week(
    venue_id: &str,
    week_start: NaiveDate,
    templates: &[ShiftTemplate],
) -> Result<Vec<ShiftSlot>, ValidationError> {
    if week_start.weekday() != Weekday::Mon {
        return Err(ValidationError::WeekStartNotMonday(week_start));
    }

    let mut next_ordinal: HashMap<(NaiveDate, NaiveTime, RoleId), u32> = HashMap::new();
    let mut slots = Vec::new();

    for (t, template) in templates.iter().enumerate() {
        let offset = u64::from(template.weekday.num_days_from_monday());
        let date = week_start
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| ValidationError::InvalidDate {
                field: "weekStart".into(),
                value: week_start.to_string(),
            })?;

        for (b, block) in template.blocks.iter().enumerate() {
            let field = format!("templates[{t}].blocks[{b}]");
            if block.count == 0 {
                return Err(ValidationError::ZeroHeadcount { field });
            }
            check_interval(&field, block.start, block.end)?;

            let ordinal = next_ordinal
                .entry((date, block.start, block.role.clone()))
                .or_insert(0);
            for _ in 0..block.count {
                slots.push(ShiftSlot::new(
                    slot_id(venue_id, date, block.start, &block.role, *ordinal),
                    venue_id,
                    date,
                    block.start,
                    block.end,
                    block.role.clone(),
                ));
                *ordinal += 1;
            }
        }
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster_core::ShiftBlock;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn expands_headcount_into_numbered_slots() {
        let templates = vec![ShiftTemplate::new(Weekday::Wed)
            .block(ShiftBlock::new(t(9, 0), t(17, 0), "chef").count(2))];

        let slots = expand_week("bistro", monday(), &templates).unwrap();
        let ids: Vec<&str> = slots.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(
            ids,
            vec!["bistro_20250108_09:00_chef_0", "bistro_20250108_09:00_chef_1"]
        );
        assert_eq!(slots[0].weekday(), Weekday::Wed);
        assert_eq!(slots[0].venue_id, "bistro");
    }

    #[test]
    fn sunday_lands_at_end_of_week() {
        let templates =
            vec![ShiftTemplate::new(Weekday::Sun).block(ShiftBlock::new(t(10, 0), t(14, 0), "host"))];
        let slots = expand_week("bistro", monday(), &templates).unwrap();
        assert_eq!(slots[0].date, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
    }

    #[test]
    fn repeated_blocks_continue_the_ordinal() {
        let block = ShiftBlock::new(t(9, 0), t(17, 0), "chef");
        let templates = vec![ShiftTemplate::new(Weekday::Mon)
            .block(block.clone())
            .block(block)];

        let slots = expand_week("bistro", monday(), &templates).unwrap();
        assert_eq!(slots[1].id, "bistro_20250106_09:00_chef_1");
    }

    #[test]
    fn regeneration_is_stable() {
        let templates = vec![
            ShiftTemplate::new(Weekday::Mon).block(ShiftBlock::new(t(9, 0), t(17, 0), "chef")),
            ShiftTemplate::new(Weekday::Fri).block(ShiftBlock::new(t(18, 0), t(23, 0), "bar").count(3)),
        ];
        assert_eq!(
            expand_week("bistro", monday(), &templates).unwrap(),
            expand_week("bistro", monday(), &templates).unwrap()
        );
    }

    #[test]
    fn week_must_start_on_monday() {
        let tuesday = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        assert_eq!(
            expand_week("bistro", tuesday, &[]),
            Err(ValidationError::WeekStartNotMonday(tuesday))
        );
    }

    #[test]
    fn zero_headcount_is_rejected() {
        let templates = vec![ShiftTemplate::new(Weekday::Mon)
            .block(ShiftBlock::new(t(9, 0), t(17, 0), "chef").count(0))];
        assert!(matches!(
            expand_week("bistro", monday(), &templates),
            Err(ValidationError::ZeroHeadcount { .. })
        ));
    }

    #[test]
    fn backwards_block_is_rejected() {
        let templates =
            vec![ShiftTemplate::new(Weekday::Mon).block(ShiftBlock::new(t(22, 0), t(2, 0), "bar"))];
        assert!(matches!(
            expand_week("bistro", monday(), &templates),
            Err(ValidationError::EmptyInterval { .. })
        ));
    }
}
