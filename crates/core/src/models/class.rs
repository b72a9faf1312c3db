use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The slice of a class record the scheduler needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub name: String,
    /// Last day of enrollment; propagation never writes past it.
    pub end_date: Option<NaiveDate>,
    pub homeroom_teacher_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub name: String,
    pub specialization: Option<String>,
}
