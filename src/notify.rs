use async_trait::async_trait;
use thiserror::Error;

use crate::models::{client_profiles, freelancer_profiles, quotes, reviews, works};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound notifications. Failures are reported, never retried here.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), NotifyError>;
}

/// Writes emails to the log instead of delivering them.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Email notification:\n{}",
            email.body
        );
        Ok(())
    }
}

/// Parties a quote email is written for.
pub struct QuoteEmailContext<'a> {
    pub quote: &'a quotes::Model,
    pub work: &'a works::Model,
    pub client: &'a client_profiles::Model,
    pub client_email: &'a str,
    pub freelancer: &'a freelancer_profiles::Model,
    pub freelancer_email: &'a str,
}

pub fn quote_email(ctx: &QuoteEmailContext<'_>) -> Email {
    let QuoteEmailContext {
        quote,
        work,
        client,
        client_email,
        freelancer,
        freelancer_email,
    } = ctx;
    let total = quote.proposed_rate * f64::from(quote.estimated_duration);

    let body = format!(
        "Hello {client_name},\n\n\
         You have received a new quote for your work posting: \"{title}\"\n\n\
         Freelancer Details:\n\
         - Name: {name}\n\
         - Email: {freelancer_email}\n\
         - Phone: {phone}\n\n\
         Quote Details:\n\
         - Proposed Rate: ${rate}/hour\n\
         - Estimated Duration: {duration} hours\n\
         - Total Estimated Cost: ${total}\n\n\
         Cover Letter:\n{cover}\n\n\
         Original Job Details:\n\
         - Title: {title}\n\
         - Description: {description}\n\
         - Your Budget: ${budget}/hour\n\
         - Location: {location}\n\n\
         You can respond directly to this email to contact the freelancer.\n",
        client_name = non_empty(&client.full_name, "there"),
        title = work.title,
        name = freelancer.display_name,
        phone = non_empty(&freelancer.phone, "Not provided"),
        rate = quote.proposed_rate,
        duration = quote.estimated_duration,
        cover = quote.cover_letter,
        description = work.description,
        budget = work.pay_per_hour,
        location = non_empty(&work.location, "Not specified"),
    );

    Email {
        to: client_email.to_string(),
        subject: format!(
            "New Quote for '{}' - {}",
            work.title, freelancer.display_name
        ),
        body,
    }
}

pub fn review_email(
    review: &reviews::Model,
    freelancer: &freelancer_profiles::Model,
    freelancer_email: &str,
    reviewer_username: &str,
) -> Email {
    Email {
        to: freelancer_email.to_string(),
        subject: format!("New {}-star review from {}", review.rating, reviewer_username),
        body: format!(
            "Hello {},\n\n{} left you a {}/5 review:\n\n{}\n",
            non_empty(&freelancer.display_name, "there"),
            reviewer_username,
            review.rating,
            non_empty(&review.comment, "(no comment)"),
        ),
    }
}

fn non_empty<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quotes::QuoteStatus;
    use crate::search::fixtures::{now, profile, work};
    use uuid::Uuid;

    #[test]
    fn quote_email_carries_terms_and_total() {
        let work = work("Wedding film", "Full day shoot", "Videography", &[]);
        let freelancer = profile("Sam Reel");
        let client = client_profiles::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: "Dana".into(),
            profile_photo: String::new(),
            city: String::new(),
            phone: String::new(),
            is_profile_complete: false,
            created_at: now(),
            updated_at: now(),
        };
        let quote = quotes::Model {
            id: Uuid::new_v4(),
            work_id: work.id,
            freelancer_id: freelancer.id,
            proposed_rate: 50.0,
            estimated_duration: 8,
            cover_letter: "I shoot weddings every weekend.".into(),
            status: QuoteStatus::Pending,
            email_sent: false,
            email_sent_at: None,
            created_at: now(),
            updated_at: now(),
        };

        let email = quote_email(&QuoteEmailContext {
            quote: &quote,
            work: &work,
            client: &client,
            client_email: "dana@example.com",
            freelancer: &freelancer,
            freelancer_email: "sam@example.com",
        });

        assert_eq!(email.to, "dana@example.com");
        assert_eq!(email.subject, "New Quote for 'Wedding film' - Sam Reel");
        assert!(email.body.contains("Hello Dana,"));
        assert!(email.body.contains("- Total Estimated Cost: $400"));
        assert!(email.body.contains("- Phone: Not provided"));
        assert!(email.body.contains("- Location: Not specified"));
    }

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        let email = Email {
            to: "a@b.c".into(),
            subject: "s".into(),
            body: "b".into(),
        };
        assert!(LogNotifier.send(&email).await.is_ok());
    }
}
