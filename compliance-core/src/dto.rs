use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendered in place of any value the backend left out.
pub const PLACEHOLDER: &str = "-";

/// Picks the first present score out of the backend's two field names.
///
/// The backend emits the score as `compliance_score` on company rows and as
/// `uyum_skoru` on dashboards, and either may be missing. Callers pass the
/// field they expect first; nothing else in the client looks at these names.
pub fn resolve_score<'a>(primary: Option<&'a Value>, fallback: Option<&'a Value>) -> Option<&'a Value> {
    primary.or(fallback)
}

/// Formats a resolved score for display, falling back to [`PLACEHOLDER`].
pub fn score_label(score: Option<&Value>) -> String {
    match score {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn or_placeholder<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uyum_skoru: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exporter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Company {
    pub fn score(&self) -> Option<&Value> {
        resolve_score(self.compliance_score.as_ref(), self.uyum_skoru.as_ref())
    }

    pub fn score_label(&self) -> String {
        score_label(self.score())
    }
}

/// Identity block nested in a dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CompanyRef {
    pub fn heading(&self) -> String {
        format!(
            "{} (ID: {})",
            self.name.clone().unwrap_or_default(),
            or_placeholder(&self.id)
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_obligations: Option<u64>,
    #[serde(default)]
    pub open_obligations: Option<u64>,
    #[serde(default)]
    pub overdue_obligations: Option<u64>,
}

impl DashboardStats {
    pub fn total_label(&self) -> String {
        or_placeholder(&self.total_obligations)
    }

    pub fn open_label(&self) -> String {
        or_placeholder(&self.open_obligations)
    }

    pub fn overdue_label(&self) -> String {
        or_placeholder(&self.overdue_obligations)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    pub obligation_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regulation_title: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub impact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_compliant: Option<bool>,
}

impl Obligation {
    /// One-line summary shown under the regulation title.
    pub fn detail_line(&self) -> String {
        format!(
            "due: {} · risk: {} · etki: {}",
            or_placeholder(&self.due_date),
            or_placeholder(&self.risk_level),
            or_placeholder(&self.impact_type)
        )
    }
}

/// Per-company view model. Always replaced as a whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub sirket: Option<CompanyRef>,
    #[serde(default)]
    pub stats: Option<DashboardStats>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub todo: Vec<Obligation>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub completed: Vec<Obligation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uyum_skoru: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<Value>,
}

impl Dashboard {
    /// Keys whose presence marks a JSON object as a dashboard.
    pub const SHAPE_KEYS: [&'static str; 4] = ["todo", "completed", "stats", "sirket"];

    /// Whether an arbitrary response body carries dashboard data.
    ///
    /// A key only counts when it is present and not `null`.
    pub fn is_dashboard_shaped(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|obj| Self::SHAPE_KEYS.iter().any(|k| obj.get(*k).is_some_and(|v| !v.is_null())))
    }

    pub fn score(&self) -> Option<&Value> {
        resolve_score(self.uyum_skoru.as_ref(), self.compliance_score.as_ref())
    }

    pub fn score_label(&self) -> String {
        score_label(self.score())
    }

    pub fn heading(&self) -> String {
        self.sirket.clone().unwrap_or_default().heading()
    }

    pub fn stats_or_default(&self) -> DashboardStats {
        self.stats.clone().unwrap_or_default()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes each element of a JSON array on its own, skipping (and logging)
/// the ones that do not fit `T`. Anything but an array decodes as empty.
pub fn decode_rows<T: DeserializeOwned>(value: Value, what: &'static str) -> Vec<T> {
    let Value::Array(rows) = value else {
        return Vec::new();
    };
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(what, index, error = %e, "skipping row that did not decode");
                None
            }
        })
        .collect()
}

fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(decode_rows(Value::deserialize(deserializer)?, "obligation"))
}
