mod inmemory;
mod postgres;

pub use inmemory::InMemoryTemplateRepo;
pub use postgres::PostgresTemplateRepo;
use skifte_domain::EmailTemplate;

#[async_trait::async_trait]
pub trait ITemplateRepo: Send + Sync {
    /// Templates are administered, not engine-owned, so writes replace any
    /// existing template under the same key
    async fn upsert(&self, template: &EmailTemplate) -> anyhow::Result<()>;
    async fn find(&self, key: &str) -> Option<EmailTemplate>;
}
