use crate::listing::{category_name, EnhancementRequest};

pub fn system_prompt() -> String {
    r#"You are a copywriter for an online second-hand marketplace. Sellers send you the title, category and description of an item they are about to list.

## Instructions
1. Rewrite the description so it is clear, appealing and accurate.
2. Keep every factual detail the seller gave (condition, size, material, defects). Never invent new facts.
3. Suggest between 3 and 8 short search tags a buyer might use to find the item.

## Output
Respond with a single JSON object and nothing else:
{"enhancedDescription": "<improved description>", "suggestedTags": ["<tag>", "..."]}"#
        .to_string()
}

pub fn user_message(request: &EnhancementRequest) -> String {
    format!(
        "**Title:** {title}\n**Category:** {category}\n\n**Description:**\n{description}",
        title = request.title.trim(),
        category = category_name(request.category.trim()),
        description = request.description.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_uses_category_display_name() {
        let request = EnhancementRequest::new("Road bike ", "sports-outdoors", " 54cm frame");
        let message = user_message(&request);
        assert!(message.contains("**Title:** Road bike\n"));
        assert!(message.contains("**Category:** Sports & Outdoors"));
        assert!(message.ends_with("54cm frame"));
    }
}
