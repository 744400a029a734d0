//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each collection of the marketplace is one table. References between tables are
//! plain string columns; integrity is maintained by the `core` layer, not by the schema.

pub mod article;
pub mod chat_message;
pub mod comment;
pub mod conversation;
pub mod like;
pub mod order;
pub mod product;
pub mod user;

// Re-export specific types to avoid conflicts
pub use article::{Column as ArticleColumn, Entity as Article, Model as ArticleModel, Tags};
pub use chat_message::{
    Column as ChatMessageColumn, Entity as ChatMessage, Model as ChatMessageModel,
};
pub use comment::{Column as CommentColumn, Entity as Comment, Model as CommentModel};
pub use conversation::{
    Column as ConversationColumn, Entity as Conversation, Model as ConversationModel,
};
pub use like::{Column as LikeColumn, Entity as Like, Model as LikeModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel, ProductUnit};
pub use user::{Column as UserColumn, Entity as User, FarmerPlan, Model as UserModel, UserRole};

/// Generates a fresh opaque record identifier.
///
/// IDs are UUIDv7, so within one process they sort in creation order.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}
