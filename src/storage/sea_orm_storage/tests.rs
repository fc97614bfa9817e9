use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpResponse, test as actix_test, web};
use chrono::{Days, NaiveDate};

use super::SeaOrmStorage;
use crate::errors::SchoolDeskError;
use crate::models::attendance::requests::AttendanceMark;
use crate::models::auth::requests::SecretKeyLookupQuery;
use crate::models::classrooms::requests::CreateClassroomRequest;
use crate::models::date_sheets::requests::{CreateDateSheetEntryRequest, CreateDateSheetRequest};
use crate::models::fees::entities::{NewFee, NewPayment, PaymentMethod};
use crate::models::fees::requests::{
    AdjustClassFeeRequest, ClassFeeListParams, SetupClassFeeRequest,
};
use crate::models::parents::requests::CreateParentRequest;
use crate::models::students::entities::Student;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::fees::ledger::today;
use crate::services::{
    AuthService, ClassroomService, DateSheetService, FeeService, auth::OnboardingKind,
};
use crate::storage::Storage;

async fn storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::in_memory().await.unwrap())
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
}

fn classroom(name: &str) -> CreateClassroomRequest {
    CreateClassroomRequest {
        name: name.to_string(),
        grade: Some("5".into()),
        section: Some("A".into()),
        stream: None,
        academic_year: Some("2025-2026".into()),
        capacity: Some(30),
        class_teacher_id: None,
        room: None,
        status: None,
    }
}

async fn student(storage: &Arc<dyn Storage>, name: &str, class_id: Option<i64>) -> Student {
    storage
        .create_student(CreateStudentRequest {
            name: name.to_string(),
            roll_number: None,
            email: None,
            gender: None,
            date_of_birth: None,
            class_id,
            father_name: Some("R. Mehta".into()),
            mother_name: None,
            guardian_name: None,
            phone: None,
            address: None,
        })
        .await
        .unwrap()
}

fn user(username: &str, role: UserRole) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email: format!("{username}@school.test"),
        password: "$argon2id$placeholder".into(),
        role,
        display_name: None,
        phone: None,
    }
}

async fn json_body(resp: HttpResponse) -> serde_json::Value {
    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sheet(
    title: &str,
    classroom_id: Option<i64>,
    start: NaiveDate,
    end: NaiveDate,
) -> CreateDateSheetRequest {
    CreateDateSheetRequest {
        title: title.to_string(),
        description: None,
        classroom_id,
        academic_year: Some("2025-2026".into()),
        exam_type: "midterm".into(),
        start_date: start,
        end_date: end,
    }
}

fn exam(date: NaiveDate, start: &str, subject_id: Option<i64>) -> CreateDateSheetEntryRequest {
    CreateDateSheetEntryRequest {
        exam_date: date,
        start_time: start.to_string(),
        end_time: "23:00".into(),
        subject_id,
        classroom_id: None,
        max_marks: Some(80),
        venue: Some("Hall A".into()),
        room_number: None,
        special_instructions: None,
    }
}

fn request_with(storage: &Arc<dyn Storage>) -> actix_web::HttpRequest {
    actix_test::TestRequest::default()
        .app_data(web::Data::new(storage.clone()))
        .to_http_request()
}

#[tokio::test]
async fn test_attendance_upsert_keeps_one_row_per_day() {
    let storage = storage().await;
    let pupil = student(&storage, "Asha", None).await;

    let first = [AttendanceMark {
        student_id: pupil.id,
        present: false,
    }];
    storage.upsert_attendance(day(1), &first, None).await.unwrap();

    let second = [AttendanceMark {
        student_id: pupil.id,
        present: true,
    }];
    storage.upsert_attendance(day(1), &second, None).await.unwrap();
    storage.upsert_attendance(day(2), &first, None).await.unwrap();

    let records = storage
        .list_student_attendance(pupil.id, None, None)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    let monday = records.iter().find(|r| r.date == day(1)).unwrap();
    assert!(monday.present);
}

#[tokio::test]
async fn test_payment_settles_fee_and_student_delete_cascades() {
    let storage = storage().await;
    let pupil = student(&storage, "Kabir", None).await;
    let fee = storage
        .create_fee(NewFee {
            student_id: pupil.id,
            fee_type_id: None,
            amount: 1200.0,
            due_date: Some(day(30)),
            academic_year: None,
            semester: None,
            description: None,
            late_fee_applicable: false,
            late_fee_rate: 0.0,
            father_name: Some("R. Mehta".into()),
            mother_name: None,
            guardian_name: None,
        })
        .await
        .unwrap();

    let (payment, receipt) = storage
        .record_payment(NewPayment {
            fee_id: fee.id,
            amount: 1200.0,
            paid_on: day(5),
            payment_method: PaymentMethod::Cash,
            transaction_id: None,
            received_by: None,
            receipt_number: "RCP-20250905-ABC123".into(),
            issued_to: pupil.name.clone(),
            parent_name: Some("R. Mehta".into()),
            notes: "Payment received for Exam".into(),
            generated_by: None,
            settles_fee: true,
        })
        .await
        .unwrap();
    assert_eq!(receipt.payment_id, payment.id);

    let settled = storage.get_fee_by_id(fee.id).await.unwrap().unwrap();
    assert!(settled.paid);
    assert_eq!(settled.payment_date, Some(day(5)));

    assert!(storage.delete_student(pupil.id).await.unwrap());
    assert!(storage.get_fee_by_id(fee.id).await.unwrap().is_none());
    assert!(storage.get_payment_by_id(payment.id).await.unwrap().is_none());
    assert!(storage.get_receipt_by_id(receipt.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_payment_for_missing_fee_writes_nothing() {
    let storage = storage().await;
    let result = storage
        .record_payment(NewPayment {
            fee_id: 404,
            amount: 10.0,
            paid_on: day(5),
            payment_method: PaymentMethod::Upi,
            transaction_id: Some("TXN-20250905-ABCDEFGH".into()),
            received_by: None,
            receipt_number: "RCP-20250905-ZZZ999".into(),
            issued_to: "nobody".into(),
            parent_name: None,
            notes: String::new(),
            generated_by: None,
            settles_fee: true,
        })
        .await;
    assert!(matches!(result, Err(SchoolDeskError::NotFound(_))));
    let receipts = storage
        .list_receipts_with_pagination(Default::default())
        .await
        .unwrap();
    assert!(receipts.items.is_empty());
}

#[actix_web::test]
async fn test_classroom_with_students_cannot_be_deleted() {
    let storage = storage().await;
    let room = storage.create_classroom(classroom("5-A")).await.unwrap();
    let pupil = student(&storage, "Meera", Some(room.id)).await;

    let service = ClassroomService::new_lazy();
    let req = request_with(&storage);
    let resp = service.delete_classroom(room.id, &req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(storage.get_classroom_by_id(room.id).await.unwrap().is_some());

    storage.delete_student(pupil.id).await.unwrap();
    let resp = service.delete_classroom(room.id, &req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(storage.get_classroom_by_id(room.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_linked_parent_key_is_rejected() {
    let storage = storage().await;
    let pupil = student(&storage, "Ira", None).await;
    let parent = storage
        .create_parent(
            CreateParentRequest {
                name: "R. Mehta".into(),
                student_id: Some(pupil.id),
                email: None,
                phone: None,
                address: None,
                relation: Some("father".into()),
            },
            "482913",
        )
        .await
        .unwrap();

    let service = AuthService::new_lazy();
    let req = request_with(&storage);
    let lookup = || SecretKeyLookupQuery {
        secret_key: "482913".into(),
    };
    let resp = service
        .lookup_secret_key(OnboardingKind::Parent, lookup(), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let account = storage
        .register_parent_account(parent.id, user("rmehta", UserRole::Parent))
        .await
        .unwrap();
    let linked = storage.get_parent_by_id(parent.id).await.unwrap().unwrap();
    assert_eq!(linked.user_id, Some(account.id));

    let resp = service
        .lookup_secret_key(OnboardingKind::Parent, lookup(), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 第二次开户整体回滚，不留下新用户
    let again = storage
        .register_parent_account(parent.id, user("rmehta2", UserRole::Parent))
        .await;
    assert!(matches!(again, Err(SchoolDeskError::Conflict(_))));
    assert!(storage.get_user_by_username("rmehta2").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_unknown_and_malformed_keys() {
    let storage = storage().await;
    let service = AuthService::new_lazy();
    let req = request_with(&storage);

    let resp = service
        .lookup_secret_key(
            OnboardingKind::Teacher,
            SecretKeyLookupQuery {
                secret_key: "12345".into(),
            },
            &req,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = service
        .lookup_secret_key(
            OnboardingKind::Teacher,
            SecretKeyLookupQuery {
                secret_key: "123456".into(),
            },
            &req,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_date_sheet_entries_inherit_classroom_and_cascade() {
    let storage = storage().await;
    let room = storage.create_classroom(classroom("7-C")).await.unwrap();
    let created = storage
        .create_date_sheet(sheet("Mid-term", Some(room.id), day(10), day(20)), None)
        .await
        .unwrap();
    assert!(!created.is_published);

    for (date, start) in [(12, "13:00"), (11, "09:00"), (12, "09:00")] {
        storage
            .create_date_sheet_entry(created.id, exam(day(date), start, None))
            .await
            .unwrap();
    }

    let entries = storage.list_date_sheet_entries(&[created.id]).await.unwrap();
    let order: Vec<(NaiveDate, &str)> = entries
        .iter()
        .map(|e| (e.exam_date, e.start_time.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![(day(11), "09:00"), (day(12), "09:00"), (day(12), "13:00")]
    );
    assert!(entries.iter().all(|e| e.classroom_id == Some(room.id)));

    let published = storage.publish_date_sheet(created.id).await.unwrap().unwrap();
    assert!(published.is_published);

    assert!(storage.delete_date_sheet(created.id).await.unwrap());
    assert!(storage.list_date_sheet_entries(&[created.id]).await.unwrap().is_empty());
    let orphan = storage
        .create_date_sheet_entry(created.id, exam(day(11), "09:00", None))
        .await;
    assert!(matches!(orphan, Err(SchoolDeskError::NotFound(_))));
}

#[actix_web::test]
async fn test_exam_schedule_lists_only_published_sheets_for_children() {
    let storage = storage().await;
    let room_a = storage.create_classroom(classroom("8-A")).await.unwrap();
    let room_b = storage.create_classroom(classroom("8-B")).await.unwrap();
    let pupil = student(&storage, "Nisha", Some(room_a.id)).await;
    let maths = storage
        .create_subject(CreateSubjectRequest {
            name: "Maths".into(),
            code: None,
            stream: None,
            classroom_id: None,
            teacher_id: None,
        })
        .await
        .unwrap();

    let parent = storage
        .create_parent(
            CreateParentRequest {
                name: "R. Mehta".into(),
                student_id: Some(pupil.id),
                email: None,
                phone: None,
                address: None,
                relation: Some("father".into()),
            },
            "730164",
        )
        .await
        .unwrap();
    let account = storage
        .register_parent_account(parent.id, user("nisha.parent", UserRole::Parent))
        .await
        .unwrap();

    let start = today().checked_add_days(Days::new(2)).unwrap();
    let end = today().checked_add_days(Days::new(9)).unwrap();
    let mut sheet_ids = Vec::new();
    for (title, classroom_id, publish) in [
        ("8-A terms", Some(room_a.id), true),
        ("8-B terms", Some(room_b.id), true),
        ("School-wide", None, false),
    ] {
        let created = storage
            .create_date_sheet(sheet(title, classroom_id, start, end), None)
            .await
            .unwrap();
        storage
            .create_date_sheet_entry(created.id, exam(start, "09:00", Some(maths.id)))
            .await
            .unwrap();
        if publish {
            storage.publish_date_sheet(created.id).await.unwrap();
        }
        sheet_ids.push(created.id);
    }

    let service = DateSheetService::new_lazy();
    let req = request_with(&storage);
    req.extensions_mut().insert(account);

    let body = json_body(service.exam_schedule(&req).await.unwrap()).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["date_sheet_title"], "8-A terms");
    assert_eq!(items[0]["child_name"], "Nisha");
    assert_eq!(items[0]["subject_name"], "Maths");

    // 未发布的日程对家长不可见
    let hidden = service.get_date_sheet(sheet_ids[2], &req).await.unwrap();
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);

    storage.publish_date_sheet(sheet_ids[2]).await.unwrap();
    let body = json_body(service.exam_schedule(&req).await.unwrap()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_class_fee_generation_bills_each_student_once() {
    let storage = storage().await;
    let room = storage.create_classroom(classroom("9-A")).await.unwrap();
    let first = student(&storage, "Arjun", Some(room.id)).await;
    let second = student(&storage, "Diya", Some(room.id)).await;
    let bus = storage.get_fee_type_by_name("Bus").await.unwrap().unwrap();

    let service = FeeService::new_lazy();
    let req = request_with(&storage);
    let setup = |base_amount: f64| SetupClassFeeRequest {
        fee_type_id: bus.id,
        base_amount: Some(base_amount),
        academic_year: Some("2025-2026".into()),
        semester: None,
        due_date: Some(day(30)),
        description: Some("Bus service".into()),
        late_fee_applicable: None,
        late_fee_rate: None,
    };

    let resp = service.setup_class_fee(room.id, setup(1200.0), &req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let class_fee = storage
        .list_class_fees(room.id, "2025-2026")
        .await
        .unwrap()
        .remove(0);

    let adjust = |amount: f64| AdjustClassFeeRequest {
        adjustment_amount: amount,
        adjustment_reason: Some("Sibling concession".into()),
    };
    let resp = service
        .adjust_class_fee(room.id, class_fee.id, adjust(-200.0), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = service
        .adjust_class_fee(room.id + 1, class_fee.id, adjust(-100.0), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = service
        .adjust_class_fee(room.id, class_fee.id, adjust(-1200.0), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 重新设置只改基础金额，调整额保留
    service.setup_class_fee(room.id, setup(1300.0), &req).await.unwrap();
    let standards = storage.list_class_fees(room.id, "2025-2026").await.unwrap();
    assert_eq!(standards.len(), 1);
    assert_eq!(standards[0].current_amount(), 1100.0);

    let query = || ClassFeeListParams {
        academic_year: Some("2025-2026".into()),
    };
    let resp = service.generate_class_fees(room.id, query(), &req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let fees = storage
        .list_fees_by_students(&[first.id, second.id])
        .await
        .unwrap();
    assert_eq!(fees.len(), 2);
    for fee in &fees {
        assert_eq!(fee.amount, 1100.0);
        assert_eq!(fee.fee_type_id, Some(bus.id));
        assert_eq!(fee.father_name.as_deref(), Some("R. Mehta"));
    }

    let resp = service.generate_class_fees(room.id, query(), &req).await.unwrap();
    let body = json_body(resp).await;
    assert_eq!(body["data"]["skipped"], 2);
    assert!(body["data"]["fees"].as_array().unwrap().is_empty());
    let fees = storage
        .list_fees_by_students(&[first.id, second.id])
        .await
        .unwrap();
    assert_eq!(fees.len(), 2);
}
