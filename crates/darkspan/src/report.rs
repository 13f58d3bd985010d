//! Human-readable rendering of measurement reports.

use darkspan_core::{MeasureReport, Measurement};

/// Render `report` as the lines an operator reads at the console.
///
/// `unit` names the physical unit that `unit_scale` converts to.
pub fn render(report: &MeasureReport, unit: &str) -> String {
    let mut lines = Vec::new();

    match &report.measurement {
        Measurement::NotFound => lines.push("No dark area has been found.".to_string()),
        Measurement::Single(region) => {
            lines.push(format!(
                "The measured thickness in pixels is: {}",
                region.pixel_length
            ));
            lines.push(format!(
                "The measured thickness in {unit} is: {}",
                region.physical_length
            ));
        }
        Measurement::Multiple(regions) => {
            lines.push(
                "More than one dark area has been found. Their thicknesses are:".to_string(),
            );
            for region in regions {
                lines.push(format!(
                    "{} pixels or {} {unit}",
                    region.pixel_length, region.physical_length
                ));
            }
        }
    }

    if let Some(open) = &report.open_region {
        lines.push(format!(
            "Dark area still open at the end point: at least {} pixels or {} {unit}",
            open.pixel_length, open.physical_length
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use darkspan_core::{Point, RegionLength};

    use super::*;

    fn report(measurement: Measurement, open_region: Option<RegionLength>) -> MeasureReport {
        MeasureReport {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            measurement,
            open_region,
            dark_samples: 0,
            sample_count: 11,
        }
    }

    fn region(len: f64) -> RegionLength {
        RegionLength::between(Point::new(0.0, 0.0), Point::new(len, 0.0), 2.0)
    }

    #[test]
    fn not_found() {
        assert_eq!(
            render(&report(Measurement::NotFound, None), "um"),
            "No dark area has been found."
        );
    }

    #[test]
    fn single_region_prints_both_units() {
        let text = render(&report(Measurement::Single(region(4.0)), None), "micrometers");
        assert_eq!(
            text,
            "The measured thickness in pixels is: 4\n\
             The measured thickness in micrometers is: 8"
        );
    }

    #[test]
    fn multiple_regions_one_line_each() {
        let text = render(
            &report(Measurement::Multiple(vec![region(1.5), region(3.0)]), None),
            "um",
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1.5 pixels or 3 um");
        assert_eq!(lines[2], "3 pixels or 6 um");
    }

    #[test]
    fn open_region_is_appended() {
        let text = render(&report(Measurement::NotFound, Some(region(2.0))), "um");
        assert!(text.ends_with("at least 2 pixels or 4 um"), "{text}");
    }
}
