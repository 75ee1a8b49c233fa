//! One async function per named procedure.
//!
//! Handlers receive already-validated inputs and perform exactly one store
//! call each. Routing by name lives in [`crate::registry`].

pub mod consultations;
pub mod inquiries;
pub mod plans;
