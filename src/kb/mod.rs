//! # Knowledge-Base Responder
//!
//! The deterministic half of the chat feature: a fixed topic mapping built
//! once at startup and a total `respond` function that maps any free-text
//! question to a canned answer. It is the chat flow's fallback whenever the
//! external model is disabled or fails, so it must never fail itself; an
//! unmatched question always falls through to a fixed default prompt.

mod entries;

pub use entries::builtin_entries;

/// Suffix stripped from a topic key when matching questions
///
/// Lets "chrome を起動したい" reach the `chromedriver` entry.
const TOPIC_KEY_SUFFIX: &str = "driver";

/// Fixed greeting returned for salutation messages
pub const GREETING: &str =
    "こんにちは！PowerShell ドライバークラスについて何でも質問してください。";

const GREETING_KEYWORDS: &[&str] = &["こんにちは", "こんばんは", "おはよう", "はじめまして", "hello"];
const USAGE_KEYWORDS: &[&str] = &["使い方", "使用方法", "how to use"];
const METHOD_KEYWORDS: &[&str] = &["メソッド", "method"];

const USAGE_PROMPT: &str = "どのクラスの使い方を知りたいですか？「ChromeDriver の使い方」のようにクラス名を含めて質問してください。";
const METHOD_PROMPT: &str =
    "どのクラスのメソッドを知りたいですか？クラス名を含めて質問してください。";
const ERROR_GUIDANCE: &str = "エラー処理については「共通エラー処理」のページを参照してください。各ドライバークラスのメソッドは失敗時に PSDriverException を投げるので、Try/Catch で捕捉し、GetErrorCode でエラー範囲を確認できます。";
const LOG_GUIDANCE: &str = "ログ出力については「共通ログ出力」のページを参照してください。WriteLog メソッドが日付別のログファイルに出力し、ログレベルは設定ファイルで変更できます。";
const INSTALL_GUIDANCE: &str = "インストールはモジュール一式を PowerShell のモジュールパスに配置し、Import-Module PSDriver を実行するだけです。各ブラウザのドライバー実行ファイルは別途 PATH に配置してください。";
const DEFAULT_ANSWER: &str = "申し訳ありません、もう少し具体的に質問してください。クラス名（ChromeDriver など）やキーワード（エラー、ログ、インストール）を含めると回答できます。";

/// A static topic record used for canned answers
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    /// Lowercase topic key matched against questions
    pub topic_key: String,
    /// One-paragraph description of the class
    pub description: String,
    /// The class's methods, in documentation order
    pub method_names: Vec<String>,
    /// A short practical note
    pub usage_note: String,
    /// A PowerShell usage example
    pub example: String,
}

/// The fixed question-to-answer mapping
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    /// Build the knowledge base with the built-in entries
    pub fn new() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }

    /// Build a knowledge base from explicit entries
    pub fn with_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// The entries, in definition order
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Answer a free-text question
    ///
    /// Matching is tried in a fixed order and the first hit wins: greeting,
    /// usage/method prompts (only when no topic is named), topic entries,
    /// then error / log / install guidance, then the default prompt. This
    /// function is total; it always returns an answer.
    pub fn respond(&self, question: &str) -> String {
        let question = question.to_lowercase();

        if contains_any(&question, GREETING_KEYWORDS) {
            return GREETING.to_string();
        }

        let topic = self.find_topic(&question);

        if topic.is_none() {
            if contains_any(&question, USAGE_KEYWORDS) {
                return USAGE_PROMPT.to_string();
            }
            if contains_any(&question, METHOD_KEYWORDS) {
                return METHOD_PROMPT.to_string();
            }
        }

        if let Some(entry) = topic {
            return format_entry(entry);
        }

        if question.contains("エラー") || question.contains("error") {
            return ERROR_GUIDANCE.to_string();
        }
        if question.contains("ログ") || question.contains("log") {
            return LOG_GUIDANCE.to_string();
        }
        if question.contains("インストール") || question.contains("install") {
            return INSTALL_GUIDANCE.to_string();
        }

        DEFAULT_ANSWER.to_string()
    }

    /// A compact topic summary passed to the external model as context
    pub fn context_hint(&self) -> String {
        let mut hint =
            String::from("このドキュメントサイトは PowerShell ドライバークラスを扱います。\n");
        for entry in &self.entries {
            hint.push_str(&format!("- {}: {}\n", entry.topic_key, entry.description));
        }
        hint
    }

    /// Find the first entry whose topic key (or its suffix-stripped form)
    /// appears in the lowercased question
    fn find_topic(&self, question: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|entry| {
            let stripped = entry
                .topic_key
                .strip_suffix(TOPIC_KEY_SUFFIX)
                .unwrap_or(&entry.topic_key);
            question.contains(&entry.topic_key)
                || (!stripped.is_empty() && question.contains(stripped))
        })
    }
}

fn contains_any(question: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| question.contains(keyword))
}

/// Assemble a canned answer from an entry's fields
fn format_entry(entry: &KnowledgeEntry) -> String {
    let methods = entry
        .method_names
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\n主なメソッド:\n{}\n\n{}\n\n使用例:\n```powershell\n{}\n```",
        entry.description, methods, entry.usage_note, entry.example
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_returns_the_fixed_greeting() {
        let kb = KnowledgeBase::new();
        assert_eq!(kb.respond("こんにちは"), GREETING);
        // The greeting wins even when other keywords appear in the message.
        assert_eq!(kb.respond("こんにちは、ChromeDriver について"), GREETING);
    }

    #[test]
    fn topic_question_includes_description_and_every_method() {
        let kb = KnowledgeBase::new();
        let answer = kb.respond("ChromeDriverの使い方を教えて");

        let entry = kb
            .entries()
            .iter()
            .find(|e| e.topic_key == "chromedriver")
            .unwrap();
        assert!(answer.contains(&entry.description));
        for method in &entry.method_names {
            assert!(answer.contains(method), "missing method {method}");
        }
    }

    #[test]
    fn suffix_stripped_topic_key_matches() {
        let kb = KnowledgeBase::new();
        let answer = kb.respond("chrome でページを開きたい");
        assert!(answer.contains("ChromeDriver") || answer.contains("Google Chrome"));
    }

    #[test]
    fn usage_question_without_topic_asks_for_one() {
        let kb = KnowledgeBase::new();
        assert_eq!(kb.respond("使い方を教えて"), USAGE_PROMPT);
    }

    #[test]
    fn method_question_without_topic_asks_for_one() {
        let kb = KnowledgeBase::new();
        assert_eq!(kb.respond("メソッドの一覧が見たい"), METHOD_PROMPT);
    }

    #[test]
    fn error_log_install_guidance() {
        let kb = KnowledgeBase::new();
        assert_eq!(kb.respond("エラーが発生しました"), ERROR_GUIDANCE);
        assert_eq!(kb.respond("ログはどこに出ますか"), LOG_GUIDANCE);
        assert_eq!(kb.respond("インストール手順は？"), INSTALL_GUIDANCE);
    }

    #[test]
    fn unmatched_question_falls_through_to_default() {
        let kb = KnowledgeBase::new();
        assert_eq!(kb.respond("天気はどうですか"), DEFAULT_ANSWER);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let kb = KnowledgeBase::new();
        let upper = kb.respond("CHROMEDRIVER について");
        let lower = kb.respond("chromedriver について");
        assert_eq!(upper, lower);
    }

    #[test]
    fn context_hint_names_every_topic() {
        let kb = KnowledgeBase::new();
        let hint = kb.context_hint();
        for entry in kb.entries() {
            assert!(hint.contains(&entry.topic_key));
        }
    }
}
