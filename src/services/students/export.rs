//! 学生名册导出

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StudentService;
use crate::errors::SchoolDeskError;
use crate::models::ErrorCode;
use crate::models::students::entities::Student;

const HEADERS: [&str; 13] = [
    "id",
    "name",
    "roll_number",
    "email",
    "gender",
    "date_of_birth",
    "class_id",
    "father_name",
    "mother_name",
    "guardian_name",
    "phone",
    "address",
    "is_active",
];

pub async fn export_students(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let students = match storage.list_all_students().await {
        Ok(students) => students,
        Err(e) => {
            error!("导出学生失败: {}", e);
            return Ok(crate::services::error_response(
                &e,
                ErrorCode::InternalServerError,
            ));
        }
    };

    let data = match students_to_csv(&students) {
        Ok(data) => data,
        Err(e) => {
            return Ok(crate::services::error_response(
                &e,
                ErrorCode::InternalServerError,
            ));
        }
    };

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"students.csv\"",
        ))
        .body(data))
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub fn students_to_csv(students: &[Student]) -> Result<Vec<u8>, SchoolDeskError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADERS)?;

    for s in students {
        wtr.write_record([
            s.id.to_string(),
            s.name.clone(),
            opt(&s.roll_number),
            opt(&s.email),
            opt(&s.gender),
            s.date_of_birth.map(|d| d.to_string()).unwrap_or_default(),
            s.class_id.map(|id| id.to_string()).unwrap_or_default(),
            opt(&s.father_name),
            opt(&s.mother_name),
            opt(&s.guardian_name),
            opt(&s.phone),
            opt(&s.address),
            s.is_active.to_string(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| SchoolDeskError::from(csv::Error::from(e.into_error())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_quotes_commas_and_keeps_header() {
        let now = chrono::Utc::now();
        let student = Student {
            id: 7,
            name: "Doe, Jane".into(),
            roll_number: Some("R-7".into()),
            email: None,
            gender: None,
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2012, 5, 1),
            class_id: Some(3),
            father_name: None,
            mother_name: Some("Mary".into()),
            guardian_name: None,
            phone: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let bytes = students_to_csv(&[student]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,name,roll_number"));
        assert_eq!(
            lines.next().unwrap(),
            "7,\"Doe, Jane\",R-7,,,2012-05-01,3,,Mary,,,,true"
        );
    }
}
