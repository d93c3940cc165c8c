//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use fra_domain::{Action, ClaimId, ClaimRecord, MapData, Status};
use fra_store::records::{HistoryRecord, MapDataRecord};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of claims.
    pub fn format_claims(&self, claims: &[ClaimRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = claims.iter().map(claim_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => Ok(self.format_claims_table(claims)),
            OutputFormat::Quiet => Ok(claims
                .iter()
                .map(|c| c.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a single claim in detail, with the actions open to the caller.
    pub fn format_claim(&self, claim: &ClaimRecord, actions: &[Action]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut value = claim_json(claim);
                value["available_actions"] =
                    serde_json::json!(actions.iter().map(|a| a.as_str()).collect::<Vec<_>>());
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => Ok(self.format_claim_table(claim, actions)),
            OutputFormat::Quiet => Ok(claim.id.to_string()),
        }
    }

    /// Format a claim's review history.
    pub fn format_history(&self, claim: &ClaimRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let records: Vec<HistoryRecord> =
                    claim.history().iter().map(HistoryRecord::from).collect();
                Ok(serde_json::to_string_pretty(&records)?)
            }
            OutputFormat::Table => Ok(self.format_history_table(claim)),
            OutputFormat::Quiet => Ok(claim.status().to_string()),
        }
    }

    /// Format a claim's boundary.
    pub fn format_boundary(&self, map: Option<&MapData>) -> Result<String> {
        match (self.format, map) {
            (OutputFormat::Json, map) => {
                let record = map.map(MapDataRecord::from);
                Ok(serde_json::to_string_pretty(&record)?)
            }
            (OutputFormat::Table, Some(map)) => Ok(self.format_boundary_table(map)),
            (OutputFormat::Table, None) => Ok(self.colorize("No boundary saved.", "yellow")),
            (OutputFormat::Quiet, Some(map)) => Ok(format!("{:.2}", map.total_area())),
            (OutputFormat::Quiet, None) => Ok(String::new()),
        }
    }

    fn format_claims_table(&self, claims: &[ClaimRecord]) -> String {
        if claims.is_empty() {
            return self.colorize("No claims found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "ID", "Status", "Type", "Applicant", "Village", "District", "Declared", "Mapped (ha)",
        ]);

        for claim in claims {
            let declared = format!("{} {}", claim.land.declared_area, claim.land.unit.as_str());
            let mapped = claim
                .map_data()
                .map(|m| format!("{:.3}", m.total_hectares()))
                .unwrap_or_else(|| "-".to_string());
            builder.push_record([
                claim.id.to_string(),
                self.status_text(claim.status()),
                claim.claim_type.to_string(),
                claim.applicant.name.clone(),
                claim.applicant.village.clone(),
                claim.applicant.district.clone(),
                declared,
                mapped,
            ]);
        }

        styled(builder)
    }

    fn format_claim_table(&self, claim: &ClaimRecord, actions: &[Action]) -> String {
        let a = &claim.applicant;
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);

        let mut row = |field: &str, value: String| builder.push_record([field.to_string(), value]);
        row("ID", claim.id.to_string());
        row("Status", self.status_text(claim.status()));
        row("Type", claim.claim_type.to_string());
        row("Applicant", a.name.clone());
        row("Contact", a.contact.clone());
        row("Identity", a.identity_number.clone());
        row(
            "Address",
            [&a.village, &a.gram_panchayat, &a.tehsil, &a.district, &a.state]
                .iter()
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        );
        row(
            "Declared",
            format!("{} {}", claim.land.declared_area, claim.land.unit.as_str()),
        );
        row("Land", claim.land.description.clone());
        if let Some(compartment) = &claim.land.compartment_number {
            row("Compartment", compartment.clone());
        }
        row("Submitted", claim.submitted_at.to_string());
        row("Reviews", claim.history().len().to_string());
        if let Some(map) = claim.map_data() {
            row(
                "Boundary",
                format!(
                    "{} area(s), {:.3} ha (revision {})",
                    map.areas().len(),
                    map.total_hectares(),
                    map.revision()
                ),
            );
        }
        if let Some(reason) = claim.rejection_reason() {
            row("Rejected", reason.to_string());
        }
        if !actions.is_empty() {
            row(
                "You may",
                actions.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", "),
            );
        }

        styled(builder)
    }

    fn format_history_table(&self, claim: &ClaimRecord) -> String {
        if claim.history().is_empty() {
            return self.colorize("No reviews recorded yet.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Time", "Officer", "Role", "Action", "From", "To", "Remarks"]);
        for (i, entry) in claim.history().iter().enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                entry.timestamp.to_string(),
                entry.officer_id.clone(),
                entry.role.to_string(),
                entry.action.to_string(),
                entry.from_status.to_string(),
                self.status_text(entry.to_status),
                entry.remarks.clone(),
            ]);
        }

        styled(builder)
    }

    fn format_boundary_table(&self, map: &MapData) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Area", "Shape", "Type", "Vertices", "m²", "ha"]);
        for area in map.areas() {
            builder.push_record([
                area.id.clone(),
                area.shape.kind().to_string(),
                area.area_type.to_string(),
                area.ring.len().to_string(),
                format!("{:.1}", area.area_value),
                format!("{:.4}", area.area_value / fra_domain::boundary::SQ_M_PER_HECTARE),
            ]);
        }

        let by_type = map
            .totals_by_type()
            .iter()
            .map(|(t, m2)| format!("{} {:.1} m²", t, m2))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{}\nTotal: {:.1} m² ({:.4} ha, {:.4} acres), revision {}\nBy type: {}",
            styled(builder),
            map.total_area(),
            map.total_hectares(),
            map.total_acres(),
            map.revision(),
            by_type
        )
    }

    /// Format a submission result.
    pub fn claim_submitted(&self, claim_id: &ClaimId) -> String {
        match self.format {
            OutputFormat::Table => self.success(&format!("Claim submitted: {}", claim_id)),
            _ => claim_id.to_string(),
        }
    }

    /// Format the result of an applied action.
    pub fn action_applied(&self, claim: &ClaimRecord) -> Result<String> {
        match self.format {
            OutputFormat::Table => {
                let entry = claim.last_entry();
                let action = entry.map(|e| e.action.as_str()).unwrap_or("-");
                Ok(self.success(&format!(
                    "{}: {} -> {}",
                    action,
                    claim.id.to_string(),
                    claim.status()
                )))
            }
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&claim_json(claim))?),
            OutputFormat::Quiet => Ok(claim.status().to_string()),
        }
    }

    /// Format the result of a boundary save.
    pub fn boundary_saved(&self, claim_id: &ClaimId, map: &MapData) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.success(&format!(
                "Boundary saved for {}: {} area(s), {:.4} ha (revision {})",
                claim_id,
                map.areas().len(),
                map.total_hectares(),
                map.revision()
            ))),
            _ => self.format_boundary(Some(map)),
        }
    }

    /// Format the result of a boundary clear.
    pub fn boundary_cleared(&self, claim_id: &ClaimId, removed: bool) -> String {
        if removed {
            self.success(&format!("Boundary cleared for {}", claim_id))
        } else {
            self.info(&format!("No boundary to clear for {}", claim_id))
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    fn status_text(&self, status: Status) -> String {
        let color = if status.is_rejection() {
            "red"
        } else if status == Status::TitleGranted {
            "green"
        } else {
            "cyan"
        };
        self.colorize(status.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn claim_json(c: &ClaimRecord) -> serde_json::Value {
    let history: Vec<HistoryRecord> = c.history().iter().map(HistoryRecord::from).collect();
    serde_json::json!({
        "id": c.id.to_string(),
        "status": c.status().as_str(),
        "claim_type": c.claim_type.as_str(),
        "applicant": {
            "name": c.applicant.name,
            "contact": c.applicant.contact,
            "identity_number": c.applicant.identity_number,
            "village": c.applicant.village,
            "gram_panchayat": c.applicant.gram_panchayat,
            "tehsil": c.applicant.tehsil,
            "district": c.applicant.district,
            "state": c.applicant.state
        },
        "land": {
            "declared_area": c.land.declared_area,
            "unit": c.land.unit.as_str(),
            "description": c.land.description,
            "compartment_number": c.land.compartment_number
        },
        "submitted_at": c.submitted_at,
        "revision": c.revision(),
        "rejection_reason": c.rejection_reason(),
        "history": history,
        "map_data": c.map_data().map(MapDataRecord::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fra_domain::{
        Applicant, Area, AreaType, AreaUnit, ClaimType, LandDetails, LatLng, Shape,
    };

    fn create_test_claim() -> ClaimRecord {
        ClaimRecord::new(
            ClaimId::new(),
            Applicant {
                name: "Lalita Maravi".to_string(),
                village: "Samnapur".to_string(),
                gram_panchayat: "Samnapur".to_string(),
                district: "Dindori".to_string(),
                ..Default::default()
            },
            ClaimType::Community,
            LandDetails {
                declared_area: 12.0,
                unit: AreaUnit::Hectares,
                description: "Grazing commons".to_string(),
                compartment_number: None,
            },
            1_700_000_000,
        )
    }

    fn create_test_map() -> MapData {
        let area = Area::compute(
            "commons".to_string(),
            Shape::Rectangle {
                south_west: LatLng::new(22.9, 81.0),
                north_east: LatLng::new(22.91, 81.01),
            },
            AreaType::Forest,
            32,
        );
        MapData::new(vec![area], 1, 1_700_000_500).unwrap()
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_claims(&[create_test_claim()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["status"], "submitted");
        assert_eq!(value[0]["claim_type"], "community");
        assert_eq!(value[0]["applicant"]["district"], "Dindori");
        assert!(value[0]["map_data"].is_null());
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let claim = create_test_claim();
        let output = formatter.format_claims(&[claim.clone()]).unwrap();
        assert_eq!(output, claim.id.to_string());
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_claims(&[create_test_claim()]).unwrap();
        assert!(output.contains("Status"));
        assert!(output.contains("Lalita Maravi"));
        assert!(output.contains("12 hectares"));
    }

    #[test]
    fn test_empty_claims() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_claims(&[]).unwrap();
        assert!(output.contains("No claims found"));
    }

    #[test]
    fn test_claim_detail_lists_actions() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_claim(&create_test_claim(), &[Action::Verify])
            .unwrap();
        assert!(output.contains("You may"));
        assert!(output.contains("verify"));
        assert!(output.contains("Samnapur, Samnapur, Dindori"));
    }

    #[test]
    fn test_boundary_formats() {
        let map = create_test_map();

        let table = Formatter::new(OutputFormat::Table, false)
            .format_boundary(Some(&map))
            .unwrap();
        assert!(table.contains("commons"));
        assert!(table.contains("rectangle"));
        assert!(table.contains("By type: forest"));

        let json = Formatter::new(OutputFormat::Json, false)
            .format_boundary(Some(&map))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["revision"], 1);
        assert_eq!(value["areas"][0]["type"], "forest");

        let none = Formatter::new(OutputFormat::Json, false)
            .format_boundary(None)
            .unwrap();
        assert_eq!(none, "null");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
