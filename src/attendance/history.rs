use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::record::TimeRecord;

/// One calendar day of a worker's history.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayGroup {
    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub day: NaiveDate,
    pub records: Vec<TimeRecord>,
}

/// Groups records by effective day for audit views, most recent day first.
/// Within a day records sort by `(created_at, id)`, so the result is the
/// same whatever order the input arrived in.
pub fn group_by_day(records: &[TimeRecord]) -> Vec<DayGroup> {
    let mut days: BTreeMap<NaiveDate, Vec<TimeRecord>> = BTreeMap::new();
    for record in records {
        days.entry(record.effective_date())
            .or_default()
            .push(record.clone());
    }

    days.into_iter()
        .rev()
        .map(|(day, mut records)| {
            records.sort_by_key(|r| (r.created_at, r.id));
            DayGroup { day, records }
        })
        .collect()
}
