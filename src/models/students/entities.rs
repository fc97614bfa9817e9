use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub roll_number: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub class_id: Option<i64>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub guardian_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    /// 收据上使用的家长姓名：父亲 > 母亲 > 监护人
    pub fn parent_name(&self) -> Option<&str> {
        [&self.father_name, &self.mother_name, &self.guardian_name]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .find(|n| !n.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        let now = chrono::Utc::now();
        Student {
            id: 1,
            name: "Asha".into(),
            roll_number: None,
            email: None,
            gender: None,
            date_of_birth: None,
            class_id: None,
            father_name: None,
            mother_name: None,
            guardian_name: None,
            phone: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_parent_name_priority() {
        let mut s = student();
        assert_eq!(s.parent_name(), None);
        s.guardian_name = Some("Uncle Ravi".into());
        assert_eq!(s.parent_name(), Some("Uncle Ravi"));
        s.mother_name = Some("Meena".into());
        assert_eq!(s.parent_name(), Some("Meena"));
        s.father_name = Some("  ".into());
        assert_eq!(s.parent_name(), Some("Meena"));
        s.father_name = Some("Raj".into());
        assert_eq!(s.parent_name(), Some("Raj"));
    }
}
