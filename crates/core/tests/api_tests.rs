//! Library API integration tests
use precis_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

const ARTICLE_URL: &str = "https://www.coastalherald.example/news/2025/northgate-wind-farm";
const TOPIC_URL: &str = "https://www.coastalherald.example/topic/world-cup";

/// Encodes text whose characters all sit below U+0100 as ISO-8859-1 bytes.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(u32::from(c)).unwrap()).collect()
}

fn words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[test]
fn test_article_fixture_end_to_end() {
    let digest = Precis::new().summarize_html(&read_fixture("article.html"), ARTICLE_URL);
    let article = digest.as_article().expect("article digest");

    assert_eq!(article.title, "Offshore wind farm clears final planning hurdle");
    assert_eq!(article.page_kind, PageKind::SingleArticle);
    assert_eq!(article.url, ARTICLE_URL);

    let summary_words = words(&article.summary);
    assert!((150..=400).contains(&summary_words), "summary has {} words", summary_words);
    assert!(article.summary.starts_with("This summary covers \"Offshore wind farm clears final planning hurdle\""));

    assert!(!article.keywords.is_empty());
    assert!(article.keywords.iter().any(|k| k.word == "wind"));
    assert!(!article.key_points.is_empty());
}

#[test]
fn test_article_fixture_drops_page_chrome() {
    let digest = Precis::new().summarize_html(&read_fixture("article.html"), ARTICLE_URL);
    let article = digest.as_article().expect("article digest");

    let everything = format!(
        "{} {} {}",
        article.summary,
        article.key_points.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(" "),
        article.keywords.iter().map(|k| k.word.as_str()).collect::<Vec<_>>().join(" ")
    );
    assert!(!everything.contains("tracking script text"));
    assert!(!everything.contains("font-family"));
    assert!(!everything.contains("Subscribe today"));
    assert!(!everything.contains("Tidal energy trial"));
}

#[test]
fn test_summaries_are_deterministic() {
    let html = read_fixture("article.html");
    let engine = Precis::new();

    let first = engine.summarize_html(&html, ARTICLE_URL);
    let second = engine.summarize_html(&html, ARTICLE_URL);
    assert_eq!(first, second);
}

#[test]
fn test_summary_preserves_source_order() {
    let html = read_fixture("article.html");
    let lexicon = Lexicon::default();
    let doc = Document::parse_with_preprocessing(&html);
    let content = Extractor::default().extract(&doc, ARTICLE_URL, &lexicon);

    let selected = ArticleSummarizer::default().select(&content.body_text, &lexicon);
    assert!(selected.len() >= 8);
    assert!(selected.windows(2).all(|pair| pair[0].index < pair[1].index));

    let positions: Vec<usize> = selected
        .iter()
        .map(|s| content.body_text.find(&s.text).expect("selected sentence comes from the body"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    // Transitions only touch the start of a sentence, so the tails stay findable.
    let digest = Precis::new().summarize_html(&html, ARTICLE_URL);
    let summary = &digest.as_article().expect("article digest").summary;
    let mut cursor = 0;
    for sentence in &selected {
        let chars: Vec<char> = sentence.text.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(25)..].iter().collect();
        let found = summary[cursor..].find(&tail).expect("sentence tail appears after the previous one");
        cursor += found + tail.len();
    }
}

#[test]
fn test_output_bounds() {
    let config = PrecisConfig::builder().keyword_count(5).build();
    let engine = Precis::with_config(config);

    for (name, url) in [("article.html", ARTICLE_URL), ("topic.html", TOPIC_URL), ("garbled.html", ARTICLE_URL)] {
        let digest = engine.summarize_html(&read_fixture(name), url);
        let article = digest.as_article().expect("article digest");
        assert!(article.key_points.len() <= 15, "{} has too many key points", name);
        assert!(article.keywords.len() <= 5, "{} has too many keywords", name);
        assert!(!article.summary.trim().is_empty());
    }
}

#[test]
fn test_keywords_are_ranked() {
    let digest = Precis::new().summarize_html(&read_fixture("article.html"), ARTICLE_URL);
    let keywords = &digest.as_article().expect("article digest").keywords;

    assert!(keywords.len() <= DEFAULT_TOP_N);
    assert!(keywords.windows(2).all(|pair| pair[0].count >= pair[1].count));
    assert!(keywords.iter().all(|k| k.word.chars().count() > 3));
}

#[test]
fn test_latin1_page_is_decoded_as_latin1() {
    let sentence = "The café owners in Montréal said the crème brûlée festival drew a record crowd to the old port district this year.";
    let body = std::iter::repeat_n(sentence, 6).collect::<Vec<_>>().join(" ");
    let html = format!(
        "<html><head><title>Café festival draws record crowd</title></head>\
         <body><article><h1>Café festival draws record crowd</h1><p>{}</p></article></body></html>",
        body
    );
    let bytes = latin1_bytes(&html);

    let decoded = resolve(&bytes, None);
    assert_eq!(decoded.encoding, "ISO-8859-1");
    assert!(decoded.fell_back);

    let digest = Precis::new().summarize_bytes(&bytes, None, "https://example.com/news/cafe-festival");
    let article = digest.as_article().expect("article digest");
    assert_eq!(article.title, "Café festival draws record crowd");
    assert!(article.summary.contains("café owners in Montréal"));
    assert!(!article.summary.contains('\u{FFFD}'));
}

#[test]
fn test_thin_page_is_an_error_summary() {
    let digest = Precis::new().summarize_html(&read_fixture("thin.html"), "https://app.example.com/dashboard");
    let error = digest.as_error().expect("error digest");

    assert_eq!(error.title, "Error");
    assert!(error.message.contains("Could not extract meaningful content"));
}

#[test]
fn test_topic_listing_scenario() {
    let digest = Precis::new().summarize_html(&read_fixture("topic.html"), TOPIC_URL);
    let article = digest.as_article().expect("article digest");

    assert_eq!(article.page_kind, PageKind::TopicListing);
    assert!(
        article
            .summary
            .starts_with("Overview: The latest news, match reports and analysis from the World Cup.")
    );
    assert!(article.key_points.len() <= 15);
}

#[test]
fn test_plain_article_url_is_not_a_listing() {
    assert_eq!(classify(ARTICLE_URL, "The council met on Monday."), PageKind::SingleArticle);
    assert_eq!(classify(TOPIC_URL, "Showing 1–20 of 340 results"), PageKind::TopicListing);
}

#[test]
fn test_garbled_noise_never_reaches_output() {
    let digest = Precis::new().summarize_html(&read_fixture("garbled.html"), "https://valleytimes.example/news/bridge");
    let article = digest.as_article().expect("article digest");

    assert_eq!(article.title, "Bridge inspection finds corrosion in main supports");

    let is_noise = |c: char| ('\u{2500}'..='\u{25FF}').contains(&c);
    assert!(!article.summary.chars().any(is_noise));
    assert!(!article.key_points.iter().any(|p| p.text.chars().any(is_noise)));
    assert!(!article.keywords.iter().any(|k| k.word.chars().any(is_noise)));
    assert!(article.summary.contains("corrosion"));
}

#[test]
fn test_digest_output_formats() {
    let digest = Precis::new().summarize_html(&read_fixture("article.html"), ARTICLE_URL);

    let text = convert_to_text(&digest, &TextConfig::default());
    assert!(text.starts_with("Offshore wind farm clears final planning hurdle\n"));

    let md = convert_to_markdown(&digest, &MarkdownConfig { include_frontmatter: true, ..Default::default() });
    assert!(md.starts_with("+++\ntitle = \"Offshore wind farm clears final planning hurdle\""));
    assert!(md.contains("## Keywords"));

    let json = convert_to_json(&digest, &JsonConfig::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "article");
    assert_eq!(value["page_kind"], "single_article");
    assert!(value["keywords"].is_array());
}

#[test]
fn test_domain_rules_from_json() {
    let rules = DomainRules::from_json_str(
        r#"{"headers": [], "difficult": [{"host": "app.example.com", "guidance": "Use the exported PDF instead."}]}"#,
    )
    .unwrap();

    let digest = Precis::new()
        .with_rules(rules)
        .summarize_html(&read_fixture("thin.html"), "https://app.example.com/dashboard");
    let error = digest.as_error().expect("error digest");
    assert!(error.message.contains("app.example.com"));
    assert!(error.message.ends_with("Use the exported PDF instead."));
}

#[test]
fn test_edge_case_empty() {
    let digest = Precis::new().summarize_html("", "");
    assert!(digest.is_error());
}

#[test]
fn test_edge_case_malformed() {
    let html = "<html><body><article><p>Unclosed paragraph about the harbour council vote <div>and a stray div";
    let digest = Precis::new().summarize_html(html, "https://example.com/news/a");
    assert!(digest.is_error() || !digest.as_article().unwrap().summary.is_empty());
}
