pub mod member;
pub mod notification;
pub mod principal;

pub use member::{Member, MemberChange, MemberInput};
pub use notification::{kinds, Notification, NotificationInput};
pub use principal::{
    LoginRequest, LoginResponse, Principal, RegisterRequest, RegisterResponse, Role, RoleChange,
    RoleUpdateRequest,
};
