//! Built-in case-tracking tables.
//!
//! Used when a deployment configures no tables of its own.

use crate::model::registry::SchemaRegistry;
use crate::model::schema::{SchemaError, TableSchema};

struct TableDef {
    name: &'static str,
    key_columns: &'static [&'static str],
    mandatory_columns: &'static [&'static str],
    columns: &'static [&'static str],
}

const BUILTIN_TABLES: &[TableDef] = &[
    TableDef {
        name: "Cases",
        key_columns: &["CaseID"],
        mandatory_columns: &["CaseID", "Owner"],
        columns: &["CaseID", "Owner"],
    },
    TableDef {
        name: "Incident",
        key_columns: &["IncidentID"],
        mandatory_columns: &[
            "IncidentID",
            "Owner",
            "Time",
            "Location",
            "Description",
            "IncidentLevel",
            "SceneDescription",
        ],
        columns: &[
            "IncidentID",
            "Owner",
            "Time",
            "Location",
            "Description",
            "IncidentLevel",
            "SceneDescription",
            "ArrestMade",
            "RaceOfVictim",
            "GenderOfVictim",
        ],
    },
    TableDef {
        name: "Officer",
        key_columns: &["OfficerID"],
        mandatory_columns: &["OfficerID", "BadgeID"],
        columns: &["OfficerID", "BadgeID"],
    },
    TableDef {
        name: "Organizations",
        key_columns: &["OrganizationID"],
        mandatory_columns: &["OrganizationID", "OrganizationName", "ContactInfo"],
        columns: &["OrganizationID", "OrganizationName", "ContactInfo"],
    },
    // `User` is reserved in SQL.
    TableDef {
        name: "Customer",
        key_columns: &["UserID"],
        mandatory_columns: &[
            "UserID",
            "DOB",
            "ContactName",
            "ContactPhone",
            "ContactEmail",
            "Location",
        ],
        columns: &[
            "UserID",
            "DOB",
            "ContactName",
            "ContactPhone",
            "ContactEmail",
            "Location",
        ],
    },
    TableDef {
        name: "CasesToIncidents",
        key_columns: &["CaseID", "IncidentID"],
        mandatory_columns: &["CaseID", "IncidentID"],
        columns: &["CaseID", "IncidentID"],
    },
    TableDef {
        name: "IncidentsToOfficers",
        key_columns: &["IncidentID", "OfficerID"],
        mandatory_columns: &["IncidentID", "OfficerID"],
        columns: &["IncidentID", "OfficerID"],
    },
    TableDef {
        name: "OrganizationsToCases",
        key_columns: &["OrganizationID", "CaseID"],
        mandatory_columns: &["OrganizationID", "CaseID"],
        columns: &["OrganizationID", "CaseID"],
    },
];

/// Builds a registry holding every built-in table.
pub fn builtin_registry() -> Result<SchemaRegistry, SchemaError> {
    SchemaRegistry::from_schemas(
        BUILTIN_TABLES
            .iter()
            .map(|table| {
                TableSchema::new(
                    table.name,
                    table.columns.iter().copied(),
                    table.key_columns.iter().copied(),
                    table.mandatory_columns.iter().copied(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?,
    )
}
