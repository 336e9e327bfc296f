//! CSV export for allocation profiles and plan comparison summaries.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::allocator::HourlyLoad;
use crate::sim::comparator::PlanResult;

/// Column header for the hourly allocation export.
const ALLOCATION_HEADER: &str = "hour,volume_kwh,tier";

/// Column header for the per-plan annual summary export.
const SUMMARY_HEADER: &str = "plan_id,plan_name,base_rate,total_revenue,total_cost,\
                              total_profit,monthly_avg_profit";

/// Exports the hourly allocation profile to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_allocation_csv(profile: &[HourlyLoad], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_allocation_csv(profile, buf)
}

/// Writes the hourly allocation profile as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_allocation_csv(profile: &[HourlyLoad], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(ALLOCATION_HEADER.split(','))?;
    for point in profile {
        wtr.write_record(&[
            point.hour.to_string(),
            format!("{:.4}", point.volume_kwh),
            point.tier.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the per-plan annual summary to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_summary_csv(results: &[PlanResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_summary_csv(results, buf)
}

/// Writes the per-plan annual summary as CSV to any writer.
///
/// One row per catalog plan, in catalog order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_summary_csv(results: &[PlanResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(SUMMARY_HEADER.split(',').map(str::trim))?;
    for result in results {
        wtr.write_record(&[
            result.plan.id.to_string(),
            result.plan.name.clone(),
            format!("{:.2}", result.plan.base_rate),
            format!("{:.2}", result.annual.total_revenue),
            format!("{:.2}", result.annual.total_cost),
            format!("{:.2}", result.annual.total_profit),
            format!("{:.2}", result.annual.monthly_avg_profit),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlanCatalog;
    use crate::config::SiteConfig;
    use crate::sim::types::Season;
    use crate::sim::{allocator, comparator};

    fn profile() -> Vec<HourlyLoad> {
        let inputs = SiteConfig::baseline().to_inputs();
        allocator::hourly_profile(&inputs, Season::Summer)
    }

    fn results() -> Vec<PlanResult> {
        let inputs = SiteConfig::baseline().to_inputs();
        comparator::compare(&inputs, &PlanCatalog::builtin().plans)
    }

    #[test]
    fn allocation_header_and_row_count() {
        let mut buf = Vec::new();
        write_allocation_csv(&profile(), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(lines.first().copied(), Some("hour,volume_kwh,tier"));
        // 1 header + 24 data rows
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn summary_header_and_row_count() {
        let mut buf = Vec::new();
        write_summary_csv(&results(), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(
            lines.first().copied(),
            Some("plan_id,plan_name,base_rate,total_revenue,total_cost,total_profit,monthly_avg_profit")
        );
        // 1 header + 4 builtin plans
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn deterministic_output() {
        let profile = profile();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_allocation_csv(&profile, &mut buf1).ok();
        write_allocation_csv(&profile, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn allocation_round_trip_parseable() {
        let mut buf = Vec::new();
        write_allocation_csv(&profile(), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.as_ref();
            let hour: Result<usize, _> = rec.unwrap()[0].parse();
            assert!(hour.is_ok(), "hour should parse as usize");
            let volume: Result<f64, _> = rec.unwrap()[1].parse();
            assert!(volume.is_ok(), "volume should parse as f64");
            assert!(
                matches!(&rec.unwrap()[2], "light" | "mid" | "heavy"),
                "tier column should be a tier name"
            );
            row_count += 1;
        }
        assert_eq!(row_count, 24);
    }

    #[test]
    fn summary_round_trip_parseable() {
        let mut buf = Vec::new();
        write_summary_csv(&results(), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(7));
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.as_ref();
            // Numeric columns parse as f64
            for i in 2..7 {
                let val: Result<f64, _> = rec.unwrap()[i].parse();
                assert!(val.is_ok(), "column {i} should parse as f64");
            }
        }
    }
}
