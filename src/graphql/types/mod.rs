pub mod member_type;
pub mod post;
pub mod profile;
pub mod user;

pub use member_type::MemberType;
pub use post::Post;
pub use profile::Profile;
pub use user::User;
