use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Standard list envelope: `{count, results}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A reference the backend sometimes sends as a bare id and sometimes as a name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Label {
    Id(i64),
    Name(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Id(id) => write!(f, "{id}"),
            Label::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterType {
    #[default]
    #[serde(rename = "MAL FUNCIONAMIENTO")]
    Malfunction,
    #[serde(rename = "OPERACIÓN")]
    Operation,
}

impl RegisterType {
    pub const ALL: [RegisterType; 2] = [RegisterType::Malfunction, RegisterType::Operation];

    pub fn label(self) -> &'static str {
        match self {
            RegisterType::Malfunction => "Mal Funcionamiento",
            RegisterType::Operation => "Operación",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FinalStatus {
    #[serde(rename = "POSIBLE MANIPULACIÓN")]
    PossibleTampering,
    #[serde(rename = "PERDIDA DE SEÑAL")]
    SignalLoss,
    #[serde(rename = "TALLER")]
    Workshop,
    #[serde(rename = "CORTACORRIENTE")]
    PowerCutoff,
    #[serde(rename = "BASE")]
    Base,
    #[serde(rename = "ACCIDENTADA")]
    Crashed,
}

impl FinalStatus {
    pub const ALL: [FinalStatus; 6] = [
        FinalStatus::PossibleTampering,
        FinalStatus::SignalLoss,
        FinalStatus::Workshop,
        FinalStatus::PowerCutoff,
        FinalStatus::Base,
        FinalStatus::Crashed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FinalStatus::PossibleTampering => "Posible Manipulación",
            FinalStatus::SignalLoss => "Perdida de Señal",
            FinalStatus::Workshop => "Taller",
            FinalStatus::PowerCutoff => "Cortacorriente",
            FinalStatus::Base => "Base",
            FinalStatus::Crashed => "Accidentada",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Responsible {
    #[default]
    #[serde(rename = "SIN ESTATUS DEL DISTRIBUIDOR")]
    NoDistributorStatus,
    #[serde(rename = "SIN ESTATUS DEL CLIENTE")]
    NoClientStatus,
    #[serde(rename = "NO OPERACIONAL")]
    NonOperational,
    #[serde(rename = "REVISIÓN FÍSICA")]
    PhysicalReview,
}

impl Responsible {
    pub const ALL: [Responsible; 4] = [
        Responsible::NoDistributorStatus,
        Responsible::NoClientStatus,
        Responsible::NonOperational,
        Responsible::PhysicalReview,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Responsible::NoDistributorStatus => "Sin Estatus del Distribuidor",
            Responsible::NoClientStatus => "Sin Estatus del Cliente",
            Responsible::NonOperational => "No Operacional",
            Responsible::PhysicalReview => "Revisión Física",
        }
    }
}

/// The backend stores "no final status" as an empty string.
mod blank_status {
    use super::*;
    use serde::de::IntoDeserializer;

    pub fn serialize<S: Serializer>(value: &Option<FinalStatus>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(status) => status.serialize(s),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FinalStatus>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(text) => {
                let de: serde::de::value::StrDeserializer<'_, D::Error> = text.into_deserializer();
                FinalStatus::deserialize(de).map(Some)
            }
        }
    }
}

/// A disconnection incident.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Register {
    pub id: i64,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default, alias = "platform_client")]
    pub client_description: Option<String>,
    #[serde(default)]
    pub distribuidor: Option<Label>,
    #[serde(default, alias = "contrato")]
    pub contract: Option<Label>,
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub last_connection: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub tipo: RegisterType,
    #[serde(default, with = "blank_status")]
    pub estatus_final: Option<FinalStatus>,
    #[serde(default)]
    pub responsable: Responsible,
    #[serde(default)]
    pub comentario: String,
}

/// Body of `PATCH /registers/{id}/`: exactly the operator-editable fields.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RegisterUpdate {
    pub tipo: RegisterType,
    #[serde(with = "blank_status")]
    pub estatus_final: Option<FinalStatus>,
    pub responsable: Responsible,
    pub comentario: String,
}

/// Body of `POST /registers/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewRegister {
    pub vehicle_id: i64,
    pub distribuidor: i64,
    pub last_connection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub disconnection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comentario: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Vehicle {
    pub id: i64,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    pub vin: String,
    #[serde(default)]
    pub last_latitude: Option<f64>,
    #[serde(default)]
    pub last_longitude: Option<f64>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub distribuidor_name: Option<String>,
    #[serde(default)]
    pub geofence_name: Option<String>,
    #[serde(default)]
    pub last_connection: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Partial body of `PATCH /vehicles/data/{id}/`; absent fields stay untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct VehicleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geofence: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrato: Option<i64>,
}

/// Server-computed connected/disconnected counts for one contract on one day.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyStats {
    #[serde(default)]
    pub date: Option<String>,
    pub connected: u64,
    pub disconnected: u64,
    #[serde(default)]
    pub percentage_connected: f64,
}

impl DailyStats {
    pub fn sampled(&self) -> u64 {
        self.connected + self.disconnected
    }

    /// `None` when nothing was sampled; a zero-vehicle day has no ratio.
    pub fn percentage(&self) -> Option<f64> {
        if self.sampled() == 0 {
            None
        } else {
            Some(self.percentage_connected)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContractMatrix {
    pub contract_name: String,
    #[serde(default)]
    pub contract_id: Option<Label>,
    #[serde(default)]
    pub daily_data: Vec<DailyStats>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GroupMatrix {
    pub group_name: String,
    #[serde(default)]
    pub group_id: Option<Label>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub data: Vec<ContractMatrix>,
}

/// Response of `GET /analytics/summary-matrix/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SummaryMatrix {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub groups: Vec<GroupMatrix>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GroupStats {
    pub group_id: i64,
    pub group_name: String,
    #[serde(default)]
    pub client_name: Option<String>,
    pub total_vehicles: u64,
    pub total_disconnections: u64,
    #[serde(default)]
    pub disconnected_route: u64,
    #[serde(default)]
    pub disconnected_base: u64,
    #[serde(default)]
    pub status_breakdown: std::collections::BTreeMap<String, u64>,
    #[serde(default)]
    pub avg_resolution_hours: f64,
    #[serde(default)]
    pub period_days: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DisconnectedVehicle {
    pub vin: String,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    pub disconnection_count: u64,
    #[serde(default)]
    pub last_connection: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TopDisconnected {
    #[serde(default)]
    pub period_days: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub vehicles: Vec<DisconnectedVehicle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_with_blank_status() {
        let register: Register = serde_json::from_value(json!({
            "id": 7,
            "vin": "3N1CN7AD5KL812345",
            "platform_client": "COPPEL",
            "distribuidor": 4,
            "problem": "Desconexión en trayecto",
            "last_connection": "2025-01-20T08:15:00Z",
            "tipo": "OPERACIÓN",
            "estatus_final": "",
            "responsable": "NO OPERACIONAL",
            "comentario": "revisar"
        }))
        .unwrap();

        assert_eq!(register.client_description.as_deref(), Some("COPPEL"));
        assert_eq!(register.distribuidor, Some(Label::Id(4)));
        assert_eq!(register.tipo, RegisterType::Operation);
        assert_eq!(register.estatus_final, None);
        assert_eq!(register.responsable, Responsible::NonOperational);
    }

    #[test]
    fn test_register_editable_fields_default() {
        let register: Register = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert_eq!(register.tipo, RegisterType::Malfunction);
        assert_eq!(register.responsable, Responsible::NoDistributorStatus);
        assert_eq!(register.estatus_final, None);
        assert!(register.comentario.is_empty());
    }

    #[test]
    fn test_update_wire_format() {
        let update = RegisterUpdate {
            tipo: RegisterType::Malfunction,
            estatus_final: Some(FinalStatus::SignalLoss),
            responsable: Responsible::PhysicalReview,
            comentario: "sin señal".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "tipo": "MAL FUNCIONAMIENTO",
                "estatus_final": "PERDIDA DE SEÑAL",
                "responsable": "REVISIÓN FÍSICA",
                "comentario": "sin señal"
            })
        );
    }

    #[test]
    fn test_vehicle_update_skips_absent_fields() {
        let update = VehicleUpdate {
            inner_id: Some(12),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "inner_id": 12 }));
    }

    #[test]
    fn test_percentage_undefined_without_samples() {
        let empty = DailyStats {
            date: None,
            connected: 0,
            disconnected: 0,
            percentage_connected: 0.0,
        };
        assert_eq!(empty.percentage(), None);

        let half = DailyStats {
            date: None,
            connected: 5,
            disconnected: 5,
            percentage_connected: 50.0,
        };
        assert_eq!(half.percentage(), Some(50.0));
    }
}
