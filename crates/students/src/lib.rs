//! `campusgate-students` — student view model and enrollment workflow.
//!
//! The enrollment workflow drives a strictly ordered four-step remote
//! creation sequence (business partner, partner location, user account,
//! role assignment). State lives in an immutable [`EnrollmentContext`];
//! every transition is a pure function returning a new context. Remote
//! calls go through the [`EnrollmentGateway`] seam so the workflow can be
//! exercised without a live ERP.

pub mod enrollment;
pub mod gateway;
pub mod student;

pub use enrollment::{
    advance, go_back, EnrollmentContext, EnrollmentError, EnrollmentStep, StepInput,
};
pub use gateway::EnrollmentGateway;
pub use student::Student;
