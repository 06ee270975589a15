//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    approvals, email_applications, employees, equipment, health, leave, loan_applications, stats,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StaffDesk API",
        version = "0.3.0",
        description = "HR & ICT Resource Administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "StaffDesk Maintainers")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Employees
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::delete_employee,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Email applications
        email_applications::list_email_applications,
        email_applications::get_email_application,
        email_applications::create_email_application,
        email_applications::update_email_application,
        email_applications::submit_email_application,
        email_applications::cancel_email_application,
        email_applications::decide_email_application,
        email_applications::provision_email_application,
        email_applications::list_email_application_approvals,
        email_applications::delete_email_application,
        // Loan applications
        loan_applications::list_loan_applications,
        loan_applications::get_loan_application,
        loan_applications::create_loan_application,
        loan_applications::update_loan_application,
        loan_applications::submit_loan_application,
        loan_applications::cancel_loan_application,
        loan_applications::decide_loan_application,
        loan_applications::list_loan_application_approvals,
        loan_applications::delete_loan_application,
        loan_applications::issue_equipment,
        loan_applications::list_loan_transactions,
        loan_applications::return_equipment,
        loan_applications::flag_overdue,
        // Approvals
        approvals::list_pending_approvals,
        // Leave
        leave::list_leave_requests,
        leave::create_leave_request,
        leave::decide_leave_request,
        leave::cancel_leave_request,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Employees
            crate::models::employee::Employee,
            crate::models::employee::EmployeeShort,
            crate::models::employee::CreateEmployee,
            crate::models::employee::UpdateEmployee,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::enums::EquipmentAvailability,
            crate::models::enums::EquipmentCondition,
            crate::models::enums::TransactionStatus,
            crate::models::enums::EmploymentStatus,
            crate::models::enums::LeaveType,
            crate::models::enums::LeaveStatus,
            // Workflow
            crate::workflow::ApplicationKind,
            crate::workflow::ApplicationStatus,
            crate::workflow::Stage,
            crate::workflow::ApprovalDecision,
            // Email applications
            crate::models::email_application::EmailApplication,
            crate::models::email_application::EmailApplicationDraft,
            crate::models::email_application::SubmitEmailApplication,
            // Loan applications
            crate::models::loan_application::LoanApplication,
            crate::models::loan_application::LoanApplicationItem,
            crate::models::loan_application::LoanItemInput,
            crate::models::loan_application::LoanApplicationDraft,
            crate::models::loan_application::SubmitLoanApplication,
            crate::models::loan_application::LoanApplicationDetails,
            crate::models::loan_application::Responsible,
            // Approvals
            crate::models::approval::Approval,
            crate::models::approval::DecisionRequest,
            // Transactions
            crate::models::loan_transaction::LoanTransaction,
            crate::models::loan_transaction::LoanTransactionDetails,
            crate::models::loan_transaction::IssueRequest,
            crate::models::loan_transaction::ReturnRequest,
            loan_applications::FlagOverdueResponse,
            // Leave
            crate::models::leave_request::LeaveRequest,
            crate::models::leave_request::CreateLeaveRequest,
            crate::models::leave_request::LeaveDecisionRequest,
            // Stats
            stats::StatsResponse,
            stats::StatusCount,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "employees", description = "Employee records"),
        (name = "equipment", description = "Equipment catalog"),
        (name = "email-applications", description = "Mailbox provisioning applications"),
        (name = "loan-applications", description = "Equipment loan applications"),
        (name = "loan-transactions", description = "Equipment hand-offs"),
        (name = "approvals", description = "Officer decision queue"),
        (name = "leave", description = "Leave requests"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
