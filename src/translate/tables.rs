//! Static UI phrase dictionaries
//!
//! Pure lookup tables for the languages the platform sees most often; any
//! other language goes through the text-generation fallback in
//! [`super::bundles`]. French is the platform default, so the non-voice forms
//! have no French entry: the client keeps its built-in strings.

use serde_json::{json, Value};

use super::bundles::FormKind;

/// Static bundle for a language code, if we carry one
pub fn static_bundle(kind: FormKind, code: &str) -> Option<Value> {
    match kind {
        FormKind::Voice => voice(code),
        FormKind::Profile => profile(code),
        FormKind::Contact => contact(code),
        FormKind::Idea => idea(code),
    }
}

/// Resolve a spelled-out language name ("anglais", "English") to a code we
/// have a voice entry for.
pub fn voice_code_for_label(label: &str) -> Option<&'static str> {
    let needle = label.trim().to_lowercase();
    for code in ["fr", "en", "es", "de"] {
        if let Some(entry) = voice(code) {
            let fr_label = entry["fr_label"].as_str().unwrap_or_default().to_lowercase();
            let native = entry["native_label"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase();
            if needle == fr_label || needle == native {
                return Some(code);
            }
        }
    }
    None
}

fn voice(code: &str) -> Option<Value> {
    let entry = match code {
        "fr" => json!({
            "fr_label": "Français",
            "native_label": "Français",
            "ui": {
                "title": "Présente-toi à l'oral",
                "intro": "Dans cet enregistrement, indique simplement :",
                "items": ["Ton nom.", "Ton prénom.", "Le site sur lequel tu travailles.", "Ton service.", "Ta fonction (poste occupé)."],
                "rec_label": "🎙️ Démarrer l'enregistrement",
                "upload_label": "📁 Importer un audio",
                "notice": "🔒 Ton audio est utilisé uniquement pour générer le texte ci-dessous. Il n'est ni conservé, ni réécouté par une autre personne."
            }
        }),
        "en" => json!({
            "fr_label": "Anglais",
            "native_label": "English",
            "ui": {
                "title": "Introduce yourself verbally",
                "intro": "In this recording, simply state:",
                "items": ["Your last name.", "Your first name.", "The site where you work.", "Your department.", "Your job title."],
                "rec_label": "🎙️ Start recording",
                "upload_label": "📁 Import an audio file",
                "notice": "🔒 Your audio is only used to generate the text below. It is neither stored nor listened to by anyone else."
            }
        }),
        "es" => json!({
            "fr_label": "Espagnol",
            "native_label": "Español",
            "ui": {
                "title": "Preséntate oralmente",
                "intro": "En esta grabación, indica simplemente:",
                "items": ["Tu apellido.", "Tu nombre.", "El sitio donde trabajas.", "Tu departamento.", "Tu puesto."],
                "rec_label": "🎙️ Iniciar la grabación",
                "upload_label": "📁 Importar un audio",
                "notice": "🔒 Tu audio solo se utiliza para generar el texto de abajo. No se conserva ni lo escucha otra persona."
            }
        }),
        "de" => json!({
            "fr_label": "Allemand",
            "native_label": "Deutsch",
            "ui": {
                "title": "Stell dich mündlich vor",
                "intro": "Nenne in dieser Aufnahme einfach:",
                "items": ["Deinen Nachnamen.", "Deinen Vornamen.", "Den Standort, an dem du arbeitest.", "Deine Abteilung.", "Deine Funktion."],
                "rec_label": "🎙️ Aufnahme starten",
                "upload_label": "📁 Audio importieren",
                "notice": "🔒 Deine Aufnahme wird nur verwendet, um den Text unten zu erzeugen. Sie wird weder gespeichert noch von anderen angehört."
            }
        }),
        _ => return None,
    };
    Some(entry)
}

fn profile(code: &str) -> Option<Value> {
    let entry = match code {
        "en" => json!({
            "title": "Let's start with you",
            "intro": "Before we begin, simply tell us <b>who you are</b>, <b>where you work</b> and <b>what your role is</b>.",
            "label_name": "First and last name",
            "label_site": "Which site do you work at?",
            "label_department": "Which department do you work in?",
            "label_role": "What is your role?",
            "placeholder_name": "E.g. Marie Dupont",
            "placeholder_site": "Select your site",
            "placeholder_department": "Select your department",
            "placeholder_role": "E.g. Maintenance technician, Store manager…",
            "placeholder_other_site": "Enter your site",
            "placeholder_other_department": "Specify your department"
        }),
        "es" => json!({
            "title": "Empezamos contigo",
            "intro": "Antes de empezar, indica simplemente <b>quién eres</b>, <b>dónde trabajas</b> y <b>cuál es tu puesto</b>.",
            "label_name": "Nombre y apellido",
            "label_site": "¿En qué sitio trabajas?",
            "label_department": "¿En qué departamento trabajas?",
            "label_role": "¿Cuál es tu puesto?",
            "placeholder_name": "Ej.: Marie Dupont",
            "placeholder_site": "Selecciona tu sitio",
            "placeholder_department": "Selecciona tu departamento",
            "placeholder_role": "Ej.: Técnico de mantenimiento, Responsable de tienda…",
            "placeholder_other_site": "Indica tu sitio",
            "placeholder_other_department": "Precisa tu departamento"
        }),
        "de" => json!({
            "title": "Wir beginnen mit dir",
            "intro": "Bevor wir anfangen, sag uns einfach, <b>wer du bist</b>, <b>wo du arbeitest</b> und <b>welche Funktion du hast</b>.",
            "label_name": "Vor- und Nachname",
            "label_site": "An welchem Standort arbeitest du?",
            "label_department": "In welcher Abteilung arbeitest du?",
            "label_role": "Was ist deine Funktion?",
            "placeholder_name": "Z. B. Marie Dupont",
            "placeholder_site": "Wähle deinen Standort",
            "placeholder_department": "Wähle deine Abteilung",
            "placeholder_role": "Z. B. Instandhaltungstechniker, Filialleiter…",
            "placeholder_other_site": "Gib deinen Standort an",
            "placeholder_other_department": "Gib deine Abteilung an"
        }),
        _ => return None,
    };
    Some(entry)
}

fn contact(code: &str) -> Option<Value> {
    let entry = match code {
        "en" => json!({
            "section_coords": "Contact details",
            "section_pref": "Contact preference",
            "email_title": "Work email address",
            "email_label": "If you have a work email address, enter it below",
            "email_placeholder": "E.g. first.last@company.com",
            "email_note": "This field is optional but makes it easier to follow up on your idea.",
            "pref_title": "How would you like to be contacted?",
            "radio_mail": "Work email",
            "radio_manager": "Through my manager"
        }),
        "es" => json!({
            "section_coords": "Datos de contacto",
            "section_pref": "Preferencia de contacto",
            "email_title": "Correo electrónico profesional",
            "email_label": "Si tienes un correo profesional, anótalo abajo",
            "email_placeholder": "Ej.: nombre.apellido@empresa.com",
            "email_note": "Este campo es opcional, pero facilita el seguimiento de tu idea.",
            "pref_title": "¿Cómo quieres que te contactemos?",
            "radio_mail": "Correo profesional",
            "radio_manager": "A través de mi responsable"
        }),
        "de" => json!({
            "section_coords": "Kontaktdaten",
            "section_pref": "Kontaktpräferenz",
            "email_title": "Berufliche E-Mail-Adresse",
            "email_label": "Wenn du eine berufliche E-Mail-Adresse hast, trage sie unten ein",
            "email_placeholder": "Z. B. vorname.nachname@firma.com",
            "email_note": "Dieses Feld ist optional, erleichtert aber die Nachverfolgung deiner Idee.",
            "pref_title": "Wie möchtest du kontaktiert werden?",
            "radio_mail": "Berufliche E-Mail",
            "radio_manager": "Über meine Führungskraft"
        }),
        _ => return None,
    };
    Some(entry)
}

fn idea(code: &str) -> Option<Value> {
    let entry = match code {
        "en" => json!({
            "panel_title": "The content of your idea",
            "panel_intro": "A few elements are enough: the goal is to understand your context, your need and the expected impact.",
            "label_type": "Type of contribution",
            "check_difficulty": "A difficulty",
            "check_improvement": "An improvement",
            "check_innovation": "An innovation",
            "label_title": "Title of your IDEA",
            "placeholder_title": "E.g. Packaging overhaul",
            "label_description": "Description (optional if audio)",
            "placeholder_description": "Describe your idea, your need, your insight…",
            "label_impact": "What would be the main impact of your idea?",
            "impact_options": {
                "placeholder": "Select the main impact",
                "ergonomie": "Working conditions / Ergonomics",
                "environnement": "Sustainability / Environment",
                "efficacite": "Time savings / Efficiency",
                "productivite": "Productivity",
                "energie": "Energy savings",
                "securite": "Safety",
                "autre": "Other (specify)"
            },
            "label_recording": "Voice recording",
            "btn_rec": "🎙️ Start recording",
            "btn_upload": "📁 Import an audio file",
            "btn_tone": "🔊 Test the sound",
            "label_media": "Illustrations (optional)",
            "label_photos": "Photos / videos",
            "btn_capture": "📷 Take a photo / video",
            "btn_media_upload": "📁 Import from your device",
            "btn_back": "◀ Back",
            "preview_title": "Preview & translation",
            "preview_intro": "This panel updates as soon as you record or import an audio file.",
            "preview_orig_label": "🗣️ Original text",
            "preview_fr_label": "🇫🇷 French translation",
            "helper_text": "Check quickly: you can then finalize and send your idea."
        }),
        "es" => json!({
            "panel_title": "El contenido de tu idea",
            "panel_intro": "Bastan unos pocos elementos: el objetivo es entender tu contexto, tu necesidad y el impacto esperado.",
            "label_type": "Tipo de contribución",
            "check_difficulty": "Una dificultad",
            "check_improvement": "Una mejora",
            "check_innovation": "Una innovación",
            "label_title": "Título de tu IDEA",
            "placeholder_title": "Ej.: Reforma de embalajes",
            "label_description": "Descripción (opcional si hay audio)",
            "placeholder_description": "Describe tu idea, tu necesidad, tu observación…",
            "label_impact": "¿Cuál sería el impacto principal de tu idea?",
            "impact_options": {
                "placeholder": "Selecciona el impacto principal",
                "ergonomie": "Condiciones de trabajo / Ergonomía",
                "environnement": "Desarrollo sostenible / Medio ambiente",
                "efficacite": "Ahorro de tiempo / Eficiencia",
                "productivite": "Productividad",
                "energie": "Ahorro de energía",
                "securite": "Seguridad",
                "autre": "Otro (precisar)"
            },
            "label_recording": "Grabación de voz",
            "btn_rec": "🎙️ Iniciar la grabación",
            "btn_upload": "📁 Importar un audio",
            "btn_tone": "🔊 Probar el sonido",
            "label_media": "Ilustraciones (opcional)",
            "label_photos": "Fotos / vídeos",
            "btn_capture": "📷 Hacer una foto / vídeo",
            "btn_media_upload": "📁 Importar desde tu dispositivo",
            "btn_back": "◀ Anterior",
            "preview_title": "Vista previa y traducción",
            "preview_intro": "Este panel se actualiza en cuanto grabas o importas un audio.",
            "preview_orig_label": "🗣️ Texto original",
            "preview_fr_label": "🇫🇷 Traducción al francés",
            "helper_text": "Comprueba rápidamente: después podrás finalizar y enviar tu idea."
        }),
        "de" => json!({
            "panel_title": "Der Inhalt deiner Idee",
            "panel_intro": "Wenige Angaben genügen: Es geht darum, deinen Kontext, deinen Bedarf und die erwartete Wirkung zu verstehen.",
            "label_type": "Art des Beitrags",
            "check_difficulty": "Eine Schwierigkeit",
            "check_improvement": "Eine Verbesserung",
            "check_innovation": "Eine Innovation",
            "label_title": "Titel deiner IDEA",
            "placeholder_title": "Z. B. Verpackungsreform",
            "label_description": "Beschreibung (optional bei Audio)",
            "placeholder_description": "Beschreibe deine Idee, deinen Bedarf, deine Beobachtung…",
            "label_impact": "Welche Hauptwirkung hätte deine Idee?",
            "impact_options": {
                "placeholder": "Wähle die Hauptwirkung",
                "ergonomie": "Arbeitsbedingungen / Ergonomie",
                "environnement": "Nachhaltigkeit / Umwelt",
                "efficacite": "Zeitgewinn / Effizienz",
                "productivite": "Produktivität",
                "energie": "Energieeinsparung",
                "securite": "Sicherheit",
                "autre": "Sonstiges (bitte angeben)"
            },
            "label_recording": "Sprachaufnahme",
            "btn_rec": "🎙️ Aufnahme starten",
            "btn_upload": "📁 Audio importieren",
            "btn_tone": "🔊 Ton testen",
            "label_media": "Illustrationen (optional)",
            "label_photos": "Fotos / Videos",
            "btn_capture": "📷 Foto / Video aufnehmen",
            "btn_media_upload": "📁 Von deinem Gerät importieren",
            "btn_back": "◀ Zurück",
            "preview_title": "Vorschau & Übersetzung",
            "preview_intro": "Dieses Feld aktualisiert sich, sobald du eine Aufnahme machst oder importierst.",
            "preview_orig_label": "🗣️ Originaltext",
            "preview_fr_label": "🇫🇷 Französische Übersetzung",
            "helper_text": "Prüfe kurz: danach kannst du deine Idee abschließen und senden."
        }),
        _ => return None,
    };
    Some(entry)
}

/// Fallback prompt asking the generation service to translate a form's
/// French strings into `lang`, answering with JSON only.
pub fn fallback_prompt(kind: FormKind, lang: &str) -> String {
    match kind {
        FormKind::Voice => format!(
            "Tu identifies la langue (language_field=\"{lang}\") et traduis : \
             title=\"Présente-toi à l'oral\", intro=\"Dans cet enregistrement, indique simplement :\", \
             items=[\"Ton nom.\",\"Ton prénom.\",\"Le site sur lequel tu travailles.\",\"Ton service.\",\"Ta fonction (poste occupé).\"], \
             rec_label=\"🎙️ Démarrer l'enregistrement\", upload_label=\"📁 Importer un audio\", \
             notice=\"🔒 Ton audio est utilisé uniquement pour générer le texte ci-dessous.\" \
             Conserve les emojis. JSON UNIQUEMENT : \
             {{\"code\":\"xx\",\"fr_label\":\"…\",\"native_label\":\"…\",\"ui\":{{\"title\":\"…\",\"intro\":\"…\",\"items\":[\"…\",\"…\",\"…\",\"…\",\"…\"],\"rec_label\":\"🎙️ …\",\"upload_label\":\"📁 …\",\"notice\":\"🔒 …\"}}}}"
        ),
        FormKind::Profile => format!(
            "Traduis du français vers la langue ISO \"{lang}\" (tutoiement si possible, balises <b> conservées). \
             Textes : title_fr=\"On démarre par toi\", intro_fr=\"Avant de commencer, indique simplement <b>qui tu es</b>, <b>où tu travailles</b> et <b>quel est ton rôle</b>.\", \
             label_name_fr=\"Nom et prénom\", label_site_fr=\"Sur quel site travailles-tu ?\", \
             label_department_fr=\"Dans quel service travailles-tu ?\", label_role_fr=\"Quelle est ta fonction ?\", \
             placeholder_name_fr=\"Ex : Marie Dupont\", placeholder_site_fr=\"Sélectionne ton site\", \
             placeholder_department_fr=\"Sélectionne ton service\", placeholder_role_fr=\"Ex : Technicien de maintenance, Responsable magasin…\", \
             placeholder_other_site_fr=\"Indique ton site\", placeholder_other_department_fr=\"Précise ton service\" \
             JSON UNIQUEMENT : {{\"title\":\"…\",\"intro\":\"…\",\"label_name\":\"…\",\"label_site\":\"…\",\"label_department\":\"…\",\"label_role\":\"…\",\"placeholder_name\":\"…\",\"placeholder_site\":\"…\",\"placeholder_department\":\"…\",\"placeholder_role\":\"…\",\"placeholder_other_site\":\"…\",\"placeholder_other_department\":\"…\"}}"
        ),
        FormKind::Contact => format!(
            "Traduis du français vers la langue ISO \"{lang}\" (tutoiement si possible). \
             Textes : section_coords_fr=\"Coordonnées\", section_pref_fr=\"Préférence de contact\", \
             email_title_fr=\"Adresse mail professionnelle\", email_label_fr=\"Si tu as une adresse mail professionnelle, note-la ci-dessous\", \
             email_placeholder_fr=\"Ex : prenom.nom@entreprise.com\", email_note_fr=\"Ce champ est facultatif, mais il facilite le suivi de ton idée.\", \
             pref_title_fr=\"Comment souhaites-tu être recontacté(e) ?\", radio_mail_fr=\"Mail professionnel\", radio_manager_fr=\"Par l'intermédiaire de mon responsable\" \
             JSON UNIQUEMENT : {{\"section_coords\":\"…\",\"section_pref\":\"…\",\"email_title\":\"…\",\"email_label\":\"…\",\"email_placeholder\":\"…\",\"email_note\":\"…\",\"pref_title\":\"…\",\"radio_mail\":\"…\",\"radio_manager\":\"…\"}}"
        ),
        FormKind::Idea => format!(
            "Traduis du français vers la langue ISO \"{lang}\" (tutoiement si possible, conserve les emojis). \
             Textes FR : panel_title=\"Contenu de ton idée\", panel_intro=\"Quelques éléments suffisent : l'objectif est de comprendre ton contexte, ton besoin et l'impact attendu.\", \
             label_type=\"Type de contribution\", check_difficulty=\"Une difficulté\", check_improvement=\"Une amélioration\", check_innovation=\"Une innovation\", \
             label_title=\"Titre de ton IDEA\", placeholder_title=\"Ex : Photo réforme\", label_description=\"Description (optionnel si audio)\", \
             placeholder_description=\"Décris ton idée, ton besoin, ton insight…\", label_impact=\"Quel impact principal aurait ton idée ?\", \
             impact_placeholder=\"Sélectionne l'impact principal\", impact_ergonomie=\"Condition de travail / Ergonomie\", \
             impact_environnement=\"Développement durable / Environnement\", impact_efficacite=\"Gain de temps / Efficacité\", \
             impact_productivite=\"Productivité\", impact_energie=\"Économie d'énergie\", impact_securite=\"Sécurité\", impact_autre=\"Autre (préciser)\", \
             label_recording=\"Enregistrement vocal\", btn_rec=\"🎙️ Démarrer l'enregistrement\", btn_upload=\"📁 Importer un audio\", btn_tone=\"🔊 Tester le son\", \
             label_media=\"Illustrations (facultatif)\", label_photos=\"Photos / vidéos\", btn_capture=\"📷 Prendre une photo / vidéo\", \
             btn_media_upload=\"📁 Importer depuis ton appareil\", btn_back=\"◀ Précédent\", preview_title=\"Aperçu & traduction\", \
             preview_intro=\"Ce panneau se mettra à jour dès que tu enregistres ou importes un audio.\", preview_orig_label=\"🗣️ Texte d'origine\", \
             preview_fr_label=\"🇫🇷 Traduction française\", helper_text=\"Vérifie rapidement : tu pourras ensuite finaliser et envoyer ton idée.\" \
             JSON UNIQUEMENT, mêmes clés avec impact_options imbriqué."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_covers_default_language() {
        let entry = static_bundle(FormKind::Voice, "fr").unwrap();
        assert_eq!(entry["fr_label"], "Français");
        assert_eq!(entry["ui"]["items"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn unknown_language_has_no_static_entry() {
        assert!(static_bundle(FormKind::Idea, "sw").is_none());
        assert!(static_bundle(FormKind::Profile, "fr").is_none());
    }

    #[test]
    fn voice_labels_resolve_to_codes() {
        assert_eq!(voice_code_for_label("Anglais"), Some("en"));
        assert_eq!(voice_code_for_label("english"), Some("en"));
        assert_eq!(voice_code_for_label("Deutsch"), Some("de"));
        assert_eq!(voice_code_for_label("klingon"), None);
    }

    #[test]
    fn fallback_prompts_name_the_language() {
        for kind in [
            FormKind::Voice,
            FormKind::Profile,
            FormKind::Contact,
            FormKind::Idea,
        ] {
            let prompt = fallback_prompt(kind, "sw");
            assert!(prompt.contains("sw"), "missing language in {:?}", kind);
            assert!(prompt.contains("JSON UNIQUEMENT"));
        }
    }
}
