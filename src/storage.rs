use crate::models::RegionStat;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save country records as CSV with header, one row per country.
pub fn save_csv<P: AsRef<Path>>(records: &[RegionStat], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "code",
        "country",
        "cases",
        "today_cases",
        "recovered",
        "today_recovered",
        "deaths",
        "today_deaths",
        "lat",
        "lng",
        "flag",
    ))?;
    for r in records {
        let t = &r.totals;
        wtr.serialize((
            &r.region_code,
            &r.region_name,
            t.cases,
            t.today_cases,
            t.recovered,
            t.today_recovered,
            t.deaths,
            t.today_deaths,
            r.coordinates.lat,
            r.coordinates.lng,
            &r.flag_url,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save country records as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[RegionStat], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
