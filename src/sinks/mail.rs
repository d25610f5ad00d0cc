//! Notification sink
//!
//! Composes the two outbound emails (internal team digest, user
//! confirmation) and delivers them through an HTTP mail relay. Composition is
//! pure; delivery is best-effort.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use super::NotificationSink;
use crate::config::MailConfig;
use crate::error::IntakeError;
use crate::store::IdeaRecord;

pub struct MailRelay {
    client: reqwest::Client,
    relay_url: Option<String>,
    api_token: Option<String>,
    from_addr: String,
}

impl MailRelay {
    pub fn new(config: &MailConfig) -> Result<Self, IntakeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            relay_url: config.relay_url.clone(),
            api_token: config.api_token.clone(),
            from_addr: config.from_addr.clone(),
        })
    }
}

#[async_trait]
impl NotificationSink for MailRelay {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), IntakeError> {
        let Some(url) = &self.relay_url else {
            warn!("Mail relay not configured, message not sent");
            return Ok(());
        };

        let mut request = self.client.post(url).json(&json!({
            "from": self.from_addr,
            "to": to,
            "subject": subject,
            "body": body,
        }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(IntakeError::Upstream(format!(
                "mail relay returned HTTP {}",
                response.status()
            )));
        }

        info!(to, subject, "Mail delivered to relay");
        Ok(())
    }
}

fn or_dash(value: &Option<String>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "—",
    }
}

/// Subject line of the internal digest
pub fn team_subject(record: &IdeaRecord) -> String {
    format!(
        "Nouvelle IDEA {} – « {} » – {}",
        record.idea_code,
        record.idea_title.as_deref().unwrap_or("Sans titre"),
        record.author_name.as_deref().unwrap_or("Auteur inconnu"),
    )
}

/// Body of the internal digest sent to the idea team, with the external
/// media links gathered during fan-out.
pub fn team_body(record: &IdeaRecord, media_links: &[String]) -> String {
    let share_types = if record.share_types.is_empty() {
        "—".to_string()
    } else {
        record.share_types.join(", ")
    };
    let media_block = if media_links.iter().all(|l| l.is_empty()) {
        "Aucun média associé".to_string()
    } else {
        media_links
            .iter()
            .filter(|l| !l.is_empty())
            .map(|l| format!("• {}", l))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Bonjour,\n\n\
         Une nouvelle IDEA vient d'être déposée sur la plateforme.\n\n\
         [Identification]\n\
         Code IDEA : {code}\n\n\
         [Profil]\n\
         Nom & prénom : {author}\n\
         Site : {site}\n\
         Service : {department}\n\
         Fonction : {role}\n\n\
         [Contact]\n\
         E-mail professionnel : {email}\n\
         Préférence de contact : {contact}\n\n\
         [IDEA]\n\
         Titre : {title}\n\
         Type(s) : {share_types}\n\
         Impact principal : {impact}\n\
         Impact précisé : {impact_other}\n\n\
         Description (texte saisi) :\n{typed}\n\n\
         Transcription de l'enregistrement\n\
         Langue détectée : {language}\n\n\
         Texte d'origine :\n{original}\n\n\
         Traduction française :\n{translation}\n\n\
         Médias associés :\n{media_block}\n\n\
         ---\n\n\
         ID interne de l'IDEA : {id}\n\
         Date de création (UTC) : {created_at}\n\n\
         Ceci est un message automatique généré par la plateforme IDEA.\n",
        code = record.idea_code,
        author = or_dash(&record.author_name),
        site = or_dash(&record.site),
        department = or_dash(&record.department),
        role = or_dash(&record.role),
        email = or_dash(&record.professional_email),
        contact = or_dash(&record.contact_mode),
        title = or_dash(&record.idea_title),
        share_types = share_types,
        impact = or_dash(&record.impact_main),
        impact_other = or_dash(&record.impact_other),
        typed = or_dash(&record.typed_text),
        language = or_dash(&record.detected_language),
        original = or_dash(&record.original_text),
        translation = or_dash(&record.french_translation),
        media_block = media_block,
        id = record.id,
        created_at = record.created_at,
    )
}

/// Subject of the confirmation sent to the submitter
pub fn confirmation_subject(record: &IdeaRecord) -> String {
    format!("Confirmation de dépôt – {}", record.idea_code)
}

/// Body of the confirmation sent to the submitter
pub fn confirmation_body(record: &IdeaRecord) -> String {
    format!(
        "Bonjour {author},\n\n\
         Votre IDEA a bien été enregistrée.\n\n\
         Référence : {code}\n\
         Titre : {title}\n\n\
         Merci pour votre contribution.\n\n\
         Ceci est un message automatique.\n",
        author = record.author_name.as_deref().unwrap_or(""),
        code = record.idea_code,
        title = record.idea_title.as_deref().unwrap_or("Sans titre"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IdeaRecord {
        IdeaRecord {
            id: "abc123".to_string(),
            created_at: "2025-11-03T12:00:00Z".to_string(),
            idea_code: "IDEA2511000001".to_string(),
            author_name: Some("Marie Dupont".to_string()),
            site: None,
            department: Some("Logistique".to_string()),
            role: None,
            professional_email: Some("marie@example.com".to_string()),
            contact_mode: None,
            typed_text: Some("Réutiliser les cartons".to_string()),
            audio_path: None,
            detected_language: Some("fr".to_string()),
            original_text: None,
            french_translation: None,
            idea_title: Some("Cartons".to_string()),
            share_types: vec!["improvement".to_string()],
            impact_main: Some("environnement".to_string()),
            impact_other: None,
            source: "web_form".to_string(),
            media_paths: vec![],
        }
    }

    #[test]
    fn digest_carries_code_and_dashes_for_missing_fields() {
        let record = record();
        let body = team_body(&record, &[]);

        assert!(body.contains("Code IDEA : IDEA2511000001"));
        assert!(body.contains("Site : —"));
        assert!(body.contains("Service : Logistique"));
        assert!(body.contains("Aucun média associé"));
        assert!(body.contains("ID interne de l'IDEA : abc123"));
    }

    #[test]
    fn digest_lists_only_successful_links() {
        let record = record();
        let links = vec![
            "https://files.example/1".to_string(),
            String::new(),
            "https://files.example/3".to_string(),
        ];
        let body = team_body(&record, &links);

        assert!(body.contains("• https://files.example/1"));
        assert!(body.contains("• https://files.example/3"));
        assert!(!body.contains("• \n"));
    }

    #[test]
    fn subjects_fall_back_when_fields_missing() {
        let mut record = record();
        record.idea_title = None;
        record.author_name = None;

        let subject = team_subject(&record);
        assert!(subject.contains("Sans titre"));
        assert!(subject.contains("Auteur inconnu"));

        assert_eq!(
            confirmation_subject(&record),
            "Confirmation de dépôt – IDEA2511000001"
        );
    }
}
