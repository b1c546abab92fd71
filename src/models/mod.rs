mod comment;
mod role;
mod ticket;
mod user;

pub use comment::{Comment, CommentView};
pub use role::{Role, RoleRecord};
pub use ticket::{Ticket, TicketStatus};
pub use user::{User, UserWithRole};
