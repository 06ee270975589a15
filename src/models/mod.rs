//! Data models for StaffDesk

pub mod approval;
pub mod claims;
pub mod email_application;
pub mod employee;
pub mod enums;
pub mod equipment;
pub mod leave_request;
pub mod loan_application;
pub mod loan_transaction;

// Re-export commonly used types
pub use approval::{Approvable, Approval};
pub use claims::{Rights, UserClaims, UserRights};
pub use email_application::EmailApplication;
pub use employee::{Employee, EmployeeShort};
pub use enums::{EmploymentStatus, EquipmentAvailability, EquipmentCondition, TransactionStatus};
pub use equipment::Equipment;
pub use leave_request::LeaveRequest;
pub use loan_application::{LoanApplication, LoanApplicationItem, Responsible};
pub use loan_transaction::LoanTransaction;
