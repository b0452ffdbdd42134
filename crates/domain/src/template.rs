use std::collections::HashMap;

/// An email template managed by administrators, one per reminder offset.
/// Subject and body may contain `{{placeholder}}` tokens which are replaced
/// by literal find and replace at render time. There is deliberately no
/// conditional or loop syntax: rendering stays deterministic and auditable.
#[derive(Debug, Clone)]
pub struct EmailTemplate {
    pub key: String,
    pub subject: String,
    pub body: String,
}

impl EmailTemplate {
    pub fn new(key: &str, subject: &str, body: &str) -> Self {
        Self {
            key: key.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Template key for the reminder sent `offset` days before renewal
    pub fn key_for_offset(offset: i64) -> String {
        format!("reminder_{}", offset)
    }

    /// Substitutes every `{{key}}` occurrence in subject and body with the
    /// corresponding value. Tokens without a matching key are replaced with
    /// the empty string, never left in the output.
    pub fn render(&self, vars: &HashMap<String, String>) -> RenderedEmail {
        RenderedEmail {
            subject: substitute(&self.subject, vars),
            html: substitute(&self.body, vars),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

fn substitute(input: &str, vars: &HashMap<String, String>) -> String {
    let mut out = input.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    strip_unresolved(&out)
}

/// Blanks any `{{...}}` token that survived substitution
fn strip_unresolved(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("{{") {
        match rest[start..].find("}}") {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Estimated yearly savings from switching provider, rounded to whole
/// currency units
pub fn estimated_savings(annual_fee: f64, rate: f64) -> i64 {
    (annual_fee * rate).round() as i64
}

/// The full set of placeholders a reminder template can reference, already
/// formatted for display. The substitution engine itself is untyped; this
/// struct is the typed projection at the call site, and the destructuring
/// in `into_map` fails to compile if a field is added without a mapping.
#[derive(Debug, Clone)]
pub struct ReminderMailVars {
    pub recipient_name: String,
    pub vehicle_name: String,
    pub registration_plate: String,
    pub renewal_date: String,
    pub days_remaining: String,
    pub status_label: String,
    /// None when the vehicle has no known annual fee; the placeholder then
    /// renders as empty
    pub estimated_savings: Option<String>,
    pub switch_url: String,
    pub callback_url: String,
    pub offer_url: String,
    pub open_pixel_url: String,
}

impl ReminderMailVars {
    pub fn into_map(self) -> HashMap<String, String> {
        let ReminderMailVars {
            recipient_name,
            vehicle_name,
            registration_plate,
            renewal_date,
            days_remaining,
            status_label,
            estimated_savings,
            switch_url,
            callback_url,
            offer_url,
            open_pixel_url,
        } = self;

        let mut vars = HashMap::new();
        vars.insert("recipient_name".to_string(), recipient_name);
        vars.insert("vehicle_name".to_string(), vehicle_name);
        vars.insert("registration_plate".to_string(), registration_plate);
        vars.insert("renewal_date".to_string(), renewal_date);
        vars.insert("days_remaining".to_string(), days_remaining);
        vars.insert("status_label".to_string(), status_label);
        if let Some(savings) = estimated_savings {
            vars.insert("estimated_savings".to_string(), savings);
        }
        vars.insert("switch_url".to_string(), switch_url);
        vars.insert("callback_url".to_string(), callback_url);
        vars.insert("offer_url".to_string(), offer_url);
        vars.insert("open_pixel_url".to_string(), open_pixel_url);
        vars
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vars(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_every_occurrence() {
        let template = EmailTemplate::new(
            "reminder_50",
            "Hi {{name}}",
            "<p>{{name}}, your {{vehicle}} renews soon. Yes, {{name}}.</p>",
        );
        let rendered = template.render(&vars(&[("name", "Kari"), ("vehicle", "EL 11223")]));
        assert_eq!(rendered.subject, "Hi Kari");
        assert_eq!(
            rendered.html,
            "<p>Kari, your EL 11223 renews soon. Yes, Kari.</p>"
        );
    }

    #[test]
    fn missing_keys_render_as_empty_string() {
        let template = EmailTemplate::new("reminder_50", "{{missing}}!", "a {{also_missing}} b");
        let rendered = template.render(&vars(&[]));
        assert_eq!(rendered.subject, "!");
        assert_eq!(rendered.html, "a  b");
        assert!(!rendered.html.contains("{{"));
    }

    #[test]
    fn unterminated_token_is_left_alone() {
        let template = EmailTemplate::new("reminder_50", "s", "broken {{token");
        let rendered = template.render(&vars(&[]));
        assert_eq!(rendered.html, "broken {{token");
    }

    #[test]
    fn rounds_savings_estimate() {
        assert_eq!(estimated_savings(4500., 0.18), 810);
        assert_eq!(estimated_savings(4503., 0.18), 811);
        assert_eq!(estimated_savings(0., 0.18), 0);
    }

    #[test]
    fn var_projection_leaves_no_tokens_behind() {
        let all_placeholders = "{{recipient_name}} {{vehicle_name}} {{registration_plate}} \
             {{renewal_date}} {{days_remaining}} {{status_label}} {{estimated_savings}} \
             {{switch_url}} {{callback_url}} {{offer_url}} {{open_pixel_url}}";
        let template = EmailTemplate::new("reminder_50", "{{vehicle_name}}", all_placeholders);

        let mail_vars = ReminderMailVars {
            recipient_name: "Kari".into(),
            vehicle_name: "Van".into(),
            registration_plate: "EL 11223".into(),
            renewal_date: "25.09.2026".into(),
            days_remaining: "50".into(),
            status_label: "Renewal is approaching".into(),
            estimated_savings: Some("810".into()),
            switch_url: "https://skifte.test/s".into(),
            callback_url: "https://skifte.test/c".into(),
            offer_url: "https://skifte.test/o".into(),
            open_pixel_url: "https://skifte.test/p".into(),
        };
        let rendered = template.render(&mail_vars.into_map());
        assert!(!rendered.html.contains("{{"));
        assert!(!rendered.html.contains("}}"));
        assert!(rendered.html.contains("810"));
        assert_eq!(rendered.subject, "Van");
    }
}
