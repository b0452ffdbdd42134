use super::ITemplateRepo;
use crate::repos::shared::inmemory_repo::*;
use skifte_domain::EmailTemplate;

pub struct InMemoryTemplateRepo {
    templates: std::sync::Mutex<Vec<EmailTemplate>>,
}

impl InMemoryTemplateRepo {
    pub fn new() -> Self {
        Self {
            templates: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITemplateRepo for InMemoryTemplateRepo {
    async fn upsert(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        let existing = find_by(&self.templates, |t| t.key == template.key);
        if existing.is_empty() {
            insert(template, &self.templates);
        } else {
            update_many(
                &self.templates,
                |t| t.key == template.key,
                |t| *t = template.clone(),
            );
        }
        Ok(())
    }

    async fn find(&self, key: &str) -> Option<EmailTemplate> {
        find_by(&self.templates, |t| t.key == key).into_iter().next()
    }
}
