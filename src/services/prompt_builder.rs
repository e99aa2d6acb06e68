// src/services/prompt_builder.rs

use crate::models::{
    review::{ReviewLength, ReviewRequest, ReviewTone},
    store::Store,
};

pub const REVIEW_SYSTEM_ROLE: &str =
    "You are a helpful assistant that writes authentic customer reviews.";
pub const SUGGESTION_SYSTEM_ROLE: &str =
    "You are a business consultant providing actionable improvement suggestions.";

/// O que vai para o provedor: papel do sistema + texto do prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInstruction {
    pub system_role: String,
    pub prompt: String,
}

pub fn rating_instruction(rating: u8) -> &'static str {
    match rating {
        5 => "Express exceptional satisfaction and highlight outstanding aspects of the service",
        4 => "Show satisfaction with minor areas for potential improvement",
        3 => "Provide balanced feedback with both positive aspects and constructive suggestions",
        2 => "Express disappointment while remaining constructive and fair",
        1 => "Express significant dissatisfaction but maintain professionalism",
        _ => "Provide honest feedback about the experience",
    }
}

pub fn length_instruction(length: ReviewLength) -> &'static str {
    match length {
        ReviewLength::Short => "Keep the review concise (50-100 words)",
        ReviewLength::Medium => "Write a detailed review (100-200 words)",
        ReviewLength::Long => "Provide a comprehensive review (200-300 words)",
    }
}

pub fn tone_instruction(tone: ReviewTone) -> &'static str {
    match tone {
        ReviewTone::Formal => "Use formal and professional language",
        ReviewTone::Friendly => "Use warm and friendly language",
        ReviewTone::Casual => "Use casual and conversational language",
    }
}

pub fn language_instruction(language: &str) -> String {
    match language {
        "ja" => "Write the review in Japanese.".to_string(),
        other => format!("Write the review in {}.", other),
    }
}

/// Monta o prompt da avaliação. Função pura: mesma loja + mesmo pedido = mesmo texto.
pub fn build_review_instruction(store: &Store, request: &ReviewRequest) -> GenerationInstruction {
    let services = store
        .services
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    // 1. Dados da loja
    let mut lines = vec![
        format!("You are a customer who visited {} ({}).", store.name, store.description),
        String::new(),
        "Store Information:".to_string(),
        format!("- Name: {}", store.name),
        format!("- Description: {}", store.description),
        format!("- Location: {}, {}", store.location.address, store.location.city),
        format!("- Services: {}", services),
    ];

    // 2. Palavras-chave (só quando existem)
    if request.include_seo && !store.seo_keywords.is_empty() {
        lines.push(format!(
            "- SEO Keywords to naturally include: {}",
            store.seo_keywords.join(", ")
        ));
    }

    if let Some(focus) = request.service_keywords.as_ref().filter(|k| !k.is_empty()) {
        lines.push(format!("- Focus on these services: {}", focus.join(", ")));
    }

    // 3. Instruções de estilo e formato
    lines.extend([
        String::new(),
        format!("Please write a {}-star review as a customer experience.", request.rating),
        String::new(),
        "Instructions:".to_string(),
        format!("- {}", rating_instruction(request.rating)),
        format!("- {}", length_instruction(request.review_length)),
        format!("- {}", tone_instruction(request.tone)),
        format!("- {}", language_instruction(&request.language)),
        "- Format the response as \"Title: [title]\\nReview: [review content]\"".to_string(),
        "- Make it sound authentic and personal".to_string(),
        "- Include specific details about the experience".to_string(),
    ]);

    // 4. Pedido livre do cliente, sem alteração
    if let Some(custom) = request.custom_prompt.as_ref().filter(|c| !c.trim().is_empty()) {
        lines.push(String::new());
        lines.push(format!("Additional requirements: {}", custom));
    }

    lines.push(String::new());
    lines.push("Write the review now:".to_string());

    GenerationInstruction {
        system_role: REVIEW_SYSTEM_ROLE.to_string(),
        prompt: lines.join("\n"),
    }
}

/// Prompt das sugestões de melhoria a partir de um feedback negativo.
pub fn build_suggestion_instruction(store_name: &str, feedback: &str) -> GenerationInstruction {
    let prompt = format!(
        "Based on this customer feedback for {store_name}:\n\
         \"{feedback}\"\n\
         \n\
         Please provide 3-5 specific, actionable improvement suggestions for the business.\n\
         Focus on practical steps they can take to address the concerns raised.\n\
         \n\
         Format each suggestion as a bullet point.\n\
         Keep suggestions concise and specific.\n\
         Write in Japanese."
    );

    GenerationInstruction {
        system_role: SUGGESTION_SYSTEM_ROLE.to_string(),
        prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::store::{Location, Service, StoreSettings};
    use chrono::Utc;
    use uuid::Uuid;

    fn store(seo_keywords: Vec<&str>) -> Store {
        let now = Utc::now();
        Store {
            id: Uuid::new_v4(),
            name: "Sakura Salon".into(),
            name_kana: None,
            description: "Cozy hair salon".into(),
            location: Location {
                address: "1-2-3 Jinnan".into(),
                city: "Shibuya".into(),
                ..Default::default()
            },
            services: vec![
                Service {
                    id: "cut".into(),
                    name: "Hair Cut".into(),
                    name_en: None,
                    description: None,
                    category: None,
                    keywords: vec![],
                },
                Service {
                    id: "color".into(),
                    name: "Hair Color".into(),
                    name_en: None,
                    description: None,
                    category: None,
                    keywords: vec![],
                },
            ],
            seo_keywords: seo_keywords.into_iter().map(String::from).collect(),
            platforms: vec![],
            settings: StoreSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn prompt_encodes_store_and_defaults() {
        let store = store(vec!["shibuya", "haircut"]);
        let request = ReviewRequest::new(store.id, 5);

        let instruction = build_review_instruction(&store, &request);
        let prompt = &instruction.prompt;

        assert_eq!(instruction.system_role, REVIEW_SYSTEM_ROLE);
        assert!(prompt.starts_with("You are a customer who visited Sakura Salon (Cozy hair salon)."));
        assert!(prompt.contains("- Location: 1-2-3 Jinnan, Shibuya"));
        assert!(prompt.contains("- Services: Hair Cut, Hair Color"));
        assert!(prompt.contains("- SEO Keywords to naturally include: shibuya, haircut"));
        assert!(prompt.contains("Please write a 5-star review"));
        assert!(prompt.contains("Express exceptional satisfaction"));
        assert!(prompt.contains("(100-200 words)"));
        assert!(prompt.contains("Use warm and friendly language"));
        assert!(prompt.contains("Write the review in Japanese."));
        assert!(prompt.contains("Title: [title]\\nReview: [review content]"));
        assert!(prompt.ends_with("Write the review now:"));
    }

    #[test]
    fn seo_keywords_are_skipped_when_disabled_or_empty() {
        let with_keywords = store(vec!["shibuya"]);
        let mut request = ReviewRequest::new(with_keywords.id, 4);
        request.include_seo = false;
        assert!(!build_review_instruction(&with_keywords, &request)
            .prompt
            .contains("SEO Keywords"));

        let without_keywords = store(vec![]);
        let request = ReviewRequest::new(without_keywords.id, 4);
        assert!(!build_review_instruction(&without_keywords, &request)
            .prompt
            .contains("SEO Keywords"));
    }

    #[test]
    fn optional_sections_follow_the_request() {
        let store = store(vec![]);
        let mut request = ReviewRequest::new(store.id, 3);
        request.service_keywords = Some(vec!["perm".into(), "spa".into()]);
        request.custom_prompt = Some("Mention the tea.".into());
        request.review_length = ReviewLength::Long;
        request.tone = ReviewTone::Casual;
        request.language = "en".into();

        let prompt = build_review_instruction(&store, &request).prompt;

        assert!(prompt.contains("- Focus on these services: perm, spa"));
        assert!(prompt.contains("Additional requirements: Mention the tea."));
        assert!(prompt.contains("(200-300 words)"));
        assert!(prompt.contains("Use casual and conversational language"));
        assert!(prompt.contains("Write the review in en."));
        assert!(prompt.contains("balanced feedback"));
    }

    #[test]
    fn out_of_range_rating_asks_for_honest_feedback() {
        assert_eq!(
            rating_instruction(9),
            "Provide honest feedback about the experience"
        );
    }

    #[test]
    fn same_input_gives_same_prompt() {
        let store = store(vec!["a"]);
        let request = ReviewRequest::new(store.id, 4);
        assert_eq!(
            build_review_instruction(&store, &request),
            build_review_instruction(&store, &request)
        );
    }

    #[test]
    fn suggestion_prompt_quotes_feedback_verbatim() {
        let instruction = build_suggestion_instruction("Sakura Salon", "Waited 40 minutes");
        assert_eq!(instruction.system_role, SUGGESTION_SYSTEM_ROLE);
        assert!(instruction
            .prompt
            .starts_with("Based on this customer feedback for Sakura Salon:\n\"Waited 40 minutes\""));
        assert!(instruction.prompt.ends_with("Write in Japanese."));
    }
}
