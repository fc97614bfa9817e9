//! 预导入模块，方便使用

pub use super::activity_logs::{
    ActiveModel as ActivityLogActiveModel, Entity as ActivityLogs, Model as ActivityLogModel,
};
pub use super::attendance::{
    ActiveModel as AttendanceActiveModel, Entity as Attendance, Model as AttendanceModel,
};
pub use super::auto_leave_approval::{
    ActiveModel as AutoLeaveApprovalActiveModel, Entity as AutoLeaveApproval,
    Model as AutoLeaveApprovalModel,
};
pub use super::class_fees::{
    ActiveModel as ClassFeeActiveModel, Entity as ClassFees, Model as ClassFeeModel,
};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::complaints::{
    ActiveModel as ComplaintActiveModel, Entity as Complaints, Model as ComplaintModel,
};
pub use super::date_sheet_entries::{
    ActiveModel as DateSheetEntryActiveModel, Entity as DateSheetEntries,
    Model as DateSheetEntryModel,
};
pub use super::date_sheets::{
    ActiveModel as DateSheetActiveModel, Entity as DateSheets, Model as DateSheetModel,
};
pub use super::discounts::{
    ActiveModel as DiscountActiveModel, Entity as Discounts, Model as DiscountModel,
};
pub use super::fee_types::{
    ActiveModel as FeeTypeActiveModel, Entity as FeeTypes, Model as FeeTypeModel,
};
pub use super::fees::{ActiveModel as FeeActiveModel, Entity as Fees, Model as FeeModel};
pub use super::leave_approval_logs::{
    ActiveModel as LeaveApprovalLogActiveModel, Entity as LeaveApprovalLogs,
    Model as LeaveApprovalLogModel,
};
pub use super::messages::{
    ActiveModel as MessageActiveModel, Entity as Messages, Model as MessageModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::parents::{ActiveModel as ParentActiveModel, Entity as Parents, Model as ParentModel};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::receipts::{
    ActiveModel as ReceiptActiveModel, Entity as Receipts, Model as ReceiptModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teacher_leaves::{
    ActiveModel as TeacherLeaveActiveModel, Entity as TeacherLeaves, Model as TeacherLeaveModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::timetable_entries::{
    ActiveModel as TimetableEntryActiveModel, Entity as TimetableEntries,
    Model as TimetableEntryModel,
};
pub use super::timetables::{
    ActiveModel as TimetableActiveModel, Entity as Timetables, Model as TimetableModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
