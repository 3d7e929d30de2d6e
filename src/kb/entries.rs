//! Static knowledge entries for the driver class documentation

use super::KnowledgeEntry;

/// Build the fixed set of knowledge entries
///
/// One entry per documented driver class. Topic keys are lowercase; matching
/// against user questions happens in the responder.
pub fn builtin_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry {
            topic_key: "webdriver".to_string(),
            description: "WebDriver は各ブラウザドライバーの基底クラスです。ブラウザの起動、ページ遷移、要素操作の共通インターフェースを提供します。"
                .to_string(),
            method_names: vec![
                "Start".to_string(),
                "Navigate".to_string(),
                "FindElement".to_string(),
                "GetTitle".to_string(),
                "Quit".to_string(),
            ],
            usage_note: "WebDriver を直接インスタンス化せず、ChromeDriver などの派生クラスを使用してください。"
                .to_string(),
            example: "$driver = [ChromeDriver]::new()\n$driver.Start()\n$driver.Navigate('https://example.com')\n$driver.Quit()"
                .to_string(),
        },
        KnowledgeEntry {
            topic_key: "chromedriver".to_string(),
            description: "ChromeDriver は Google Chrome ブラウザを自動操作するためのクラスです。WebDriver クラスを継承し、Chrome 固有のオプション設定に対応します。"
                .to_string(),
            method_names: vec![
                "Start".to_string(),
                "Navigate".to_string(),
                "FindElement".to_string(),
                "Click".to_string(),
                "SendKeys".to_string(),
                "GetText".to_string(),
                "TakeScreenshot".to_string(),
                "Quit".to_string(),
            ],
            usage_note: "chromedriver.exe のバージョンはインストール済みの Chrome 本体と一致させてください。"
                .to_string(),
            example: "$driver = [ChromeDriver]::new()\n$driver.Start()\n$driver.Navigate('https://example.com')\n$element = $driver.FindElement('#login')\n$element.Click()\n$driver.Quit()"
                .to_string(),
        },
        KnowledgeEntry {
            topic_key: "edgedriver".to_string(),
            description: "EdgeDriver は Microsoft Edge ブラウザを自動操作するためのクラスです。WebDriver クラスを継承し、Edge 固有の起動オプションに対応します。"
                .to_string(),
            method_names: vec![
                "Start".to_string(),
                "Navigate".to_string(),
                "FindElement".to_string(),
                "Click".to_string(),
                "SendKeys".to_string(),
                "GetText".to_string(),
                "Quit".to_string(),
            ],
            usage_note: "msedgedriver.exe が PATH 上にあることを確認してから Start を呼び出してください。"
                .to_string(),
            example: "$driver = [EdgeDriver]::new()\n$driver.Start()\n$driver.Navigate('https://example.com')\n$driver.Quit()"
                .to_string(),
        },
        KnowledgeEntry {
            topic_key: "firefoxdriver".to_string(),
            description: "FirefoxDriver は Mozilla Firefox ブラウザを自動操作するためのクラスです。geckodriver を経由して WebDriver プロトコルで通信します。"
                .to_string(),
            method_names: vec![
                "Start".to_string(),
                "Navigate".to_string(),
                "FindElement".to_string(),
                "Click".to_string(),
                "GetText".to_string(),
                "Quit".to_string(),
            ],
            usage_note: "geckodriver のログは共通ログ出力の設定に従って記録されます。".to_string(),
            example: "$driver = [FirefoxDriver]::new()\n$driver.Start()\n$driver.Navigate('https://example.com')\n$driver.Quit()"
                .to_string(),
        },
    ]
}
