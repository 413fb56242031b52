use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed item as produced by the ingestion side. Read-only here.
///
/// Field names on the wire are part of the public contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub article_id: String,
    pub article_url: String,
    pub provider_id: String,
    pub provider_name: String,
    pub provider_avatar: String,
    pub title: String,
    pub thumbnail: String,
    pub insert_date: DateTime<Utc>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_field_names() {
        let article = Article {
            article_id: "a-1".to_string(),
            article_url: "https://blog.example.com/post/1".to_string(),
            provider_id: "p-1".to_string(),
            provider_name: "Example Blog".to_string(),
            provider_avatar: "https://blog.example.com/avatar.png".to_string(),
            title: "Hello".to_string(),
            thumbnail: "https://blog.example.com/thumb.png".to_string(),
            insert_date: Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap(),
            keywords: vec!["rust".to_string()],
        };

        let value = serde_json::to_value(&article).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "articleId",
            "articleUrl",
            "providerId",
            "providerName",
            "providerAvatar",
            "title",
            "thumbnail",
            "insertDate",
            "keywords",
        ] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert_eq!(object.len(), 9);
        assert_eq!(value["insertDate"], "2021-03-04T05:06:07Z");
    }

    #[test]
    fn test_missing_keywords_default_to_empty() {
        let json = r#"{
            "articleId": "a-2",
            "articleUrl": "https://x.dev/2",
            "providerId": "x",
            "providerName": "X",
            "providerAvatar": "",
            "title": "t",
            "thumbnail": "",
            "insertDate": "2022-01-01T00:00:00Z"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert!(article.keywords.is_empty());
    }
}
