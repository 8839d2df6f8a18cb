//! Purchases module - virtual purchases owned by a user.

mod purchases_model;
mod purchases_service;
mod purchases_traits;

#[cfg(test)]
mod purchases_service_tests;

pub use purchases_model::{
    shares_for, NewVirtualPurchase, PurchaseDefaults, VirtualPurchase, VirtualPurchaseUpdate,
};
pub use purchases_service::PurchaseService;
pub use purchases_traits::{PurchaseRepositoryTrait, PurchaseServiceTrait};
