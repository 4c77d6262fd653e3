// Test Data Factories
//
// Request payloads in the wire format of the entries API.

use serde_json::{json, Map, Value};

/// Builder for `POST /revenue-entries` bodies
pub struct EntryPayload {
    body: Map<String, Value>,
    months: Map<String, Value>,
}

impl EntryPayload {
    pub fn new(account: &str, dl: &str) -> Self {
        let body = json!({
            "probability": "0.5",
            "type": "NB",
            "bd": "Anna Nowak",
            "dl": dl,
            "pm": "Ewa Lis",
            "accountName": account,
            "projectName": format!("{} rollout", account),
            "projectType": "Project",
            "updateDate": "2024-05-02",
        });

        Self {
            body: body.as_object().cloned().unwrap_or_default(),
            months: Map::new(),
        }
    }

    pub fn probability(mut self, probability: &str) -> Self {
        self.body.insert("probability".into(), json!(probability));
        self
    }

    pub fn sales_type(mut self, code: &str) -> Self {
        self.body.insert("type".into(), json!(code));
        self
    }

    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.body.insert(name.into(), value);
        self
    }

    pub fn month(mut self, month: &str, estimated: &str, actual: &str) -> Self {
        self.months.insert(
            month.into(),
            json!({ "estimated": estimated, "actual": actual }),
        );
        self
    }

    pub fn build(mut self) -> Value {
        self.body
            .insert("monthlyRevenues".into(), Value::Object(self.months));
        Value::Object(self.body)
    }
}

/// Single-field edit as accepted by `PATCH /revenue-entries/{id}`
pub fn field_update(field: &str, value: Value) -> Value {
    json!({ "field": field, "value": value })
}

pub fn month_update(month: &str, kind: &str, value: &str) -> Value {
    json!({ "field": "monthly_revenue", "month": month, "kind": kind, "value": value })
}
