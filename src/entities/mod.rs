//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod gym_class;
pub mod notification;
pub mod payslip;
pub mod pt_package;
pub mod pt_session;
pub mod user;

// Re-export specific types to avoid conflicts
pub use gym_class::{Column as GymClassColumn, Entity as GymClass, Model as GymClassModel};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use payslip::{Column as PayslipColumn, Entity as Payslip, Model as PayslipModel};
pub use pt_package::{Column as PtPackageColumn, Entity as PtPackage, Model as PtPackageModel};
pub use pt_session::{Column as PtSessionColumn, Entity as PtSession, Model as PtSessionModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
