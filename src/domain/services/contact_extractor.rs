// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email regex")
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("url regex"));

static INSTAGRAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)instagram\.com/([A-Za-z0-9._]+)").expect("instagram regex")
});

/// 结构校验：本地部分必须以字母数字开头，域名必须有2-6位的TLD
static STRICT_EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.+\-]*@[a-zA-Z0-9\-]+(\.[a-zA-Z0-9\-]+)*\.[a-zA-Z]{2,6}$")
        .expect("strict email regex")
});

/// 占位/示例性质的本地部分，不构成联系信号
static BLACKLISTED_LOCAL_PARTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "sample", "example", "test", "noreply", "no-reply", "donotreply", "info", "admin",
        "support", "hello", "contact", "email", "user", "dummy", "fake", "spam", "mail",
        "webmaster", "postmaster", "sales", "marketing", "help", "abc", "xyz", "demo",
    ]
    .into_iter()
    .collect()
});

/// 占位域名、常见拼写错误域名与一次性邮箱服务
static BLACKLISTED_DOMAINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "example.com", "example.org", "example.net",
        "test.com", "test.org",
        "domain.com", "yourdomain.com", "yoursite.com",
        "website.com", "email.com", "myemail.com",
        "gmail.con", "gamil.com", "gmal.com",
        "hotmail.con", "yaho.com", "yahooo.com",
        "tempmail.com", "mailinator.com", "guerrillamail.com",
        "10minutemail.com", "throwaway.com", "fakeinbox.com",
        "dispostable.com", "trashmail.com", "sharklasers.com",
    ]
    .into_iter()
    .collect()
});

/// 提取结果
///
/// 各列表保持首次出现顺序且已去重，"首选"语义即取第一个元素。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    /// (平台标识, 链接)
    pub social_links: Vec<(String, String)>,
    pub websites: Vec<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.social_links.is_empty() && self.websites.is_empty()
    }

    /// 合并另一份提取结果，保持去重与顺序
    pub fn merge(&mut self, other: ContactInfo) {
        let known: HashSet<String> = self.emails.iter().cloned().collect();
        for email in other.emails {
            if !known.contains(&email) && !self.emails.contains(&email) {
                self.emails.push(email);
            }
        }
        for link in other.social_links {
            if !self.social_links.contains(&link) {
                self.social_links.push(link);
            }
        }
        for site in other.websites {
            if !self.websites.contains(&site) {
                self.websites.push(site);
            }
        }
    }
}

/// 从自由文本提取联系方式
///
/// 邮箱统一转小写并经过完整校验，占位地址不计入；URL按主机名
/// 分类到社交平台或普通网站，指向视频平台自身的链接不计入网站列表。
pub fn extract_contacts(text: &str) -> ContactInfo {
    let mut info = ContactInfo::default();
    let mut seen_emails = HashSet::new();
    let mut seen_urls = HashSet::new();

    for m in EMAIL_RE.find_iter(text) {
        let email = m.as_str().to_lowercase();
        if !is_valid_email(&email) {
            continue;
        }
        if seen_emails.insert(email.clone()) {
            info.emails.push(email);
        }
    }

    for m in URL_RE.find_iter(text) {
        let url = m.as_str().trim_end_matches(['.', ',', ';']).to_string();
        if !seen_urls.insert(url.to_lowercase()) {
            continue;
        }
        match classify_platform(&url) {
            Some(platform) => info.social_links.push((platform.to_string(), url)),
            None => {
                if !is_video_platform(&url) {
                    info.websites.push(url);
                }
            }
        }
    }

    info
}

/// 从 Instagram 链接解析用户名
pub fn instagram_username(url: &str) -> Option<String> {
    let caps = INSTAGRAM_RE.captures(url)?;
    let name = caps.get(1)?.as_str().trim_matches('.');
    // 路径段而非用户名
    const RESERVED: [&str; 4] = ["p", "reel", "explore", "stories"];
    if name.is_empty() || RESERVED.contains(&name.to_lowercase().as_str()) {
        return None;
    }
    Some(name.to_string())
}

fn classify_platform(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    if lower.contains("instagram.com/") {
        Some("instagram")
    } else if lower.contains("twitter.com/") || lower.contains("//x.com/") {
        Some("twitter")
    } else if lower.contains("tiktok.com/") {
        Some("tiktok")
    } else if lower.contains("facebook.com/") {
        Some("facebook")
    } else {
        None
    }
}

fn is_video_platform(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("youtube.com") || lower.contains("youtu.be")
}

/// 完整的邮箱校验流程
///
/// 依次执行：结构正则、域名黑名单、本地部分黑名单、长度与
/// 资源路径兜底检查。只有全部通过的地址才算联系信号，
/// "noreply@…"、"info@yourdomain.com" 一类的占位地址在此拦截。
pub fn is_valid_email(raw: &str) -> bool {
    let email = raw.trim().to_lowercase();

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if !STRICT_EMAIL_RE.is_match(&email) {
        return false;
    }
    if BLACKLISTED_DOMAINS.contains(domain) {
        return false;
    }
    if BLACKLISTED_LOCAL_PARTS.contains(local) {
        return false;
    }
    if local.len() < 2 || domain.len() < 4 {
        return false;
    }

    // "icon@2x.png" 一类的资源路径误匹配
    const ASSET_SUFFIXES: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".webp"];
    if ASSET_SUFFIXES.iter().any(|s| domain.ends_with(s)) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_and_lowercases_emails() {
        let info = extract_contacts("Business: BizDesk@SomeBrand.COM or backup@mail.dev");
        assert_eq!(
            info.emails,
            vec![
                "bizdesk@somebrand.com".to_string(),
                "backup@mail.dev".to_string()
            ]
        );
    }

    #[test]
    fn test_duplicate_emails_collapse() {
        let info = extract_contacts("ab@cd.com ... ab@cd.com ... AB@CD.com");
        assert_eq!(info.emails, vec!["ab@cd.com".to_string()]);
    }

    #[test]
    fn test_asset_paths_are_not_emails() {
        let info = extract_contacts("see logo@2x.png for details");
        assert!(info.emails.is_empty());
    }

    #[test]
    fn test_placeholder_local_parts_are_rejected() {
        for email in [
            "noreply@realcompany.com",
            "no-reply@realcompany.com",
            "info@somebrand.in",
            "admin@somebrand.in",
            "test@somebrand.in",
        ] {
            assert!(!is_valid_email(email), "{} should be rejected", email);
        }
        // 真实联系地址不受影响
        assert!(is_valid_email("priya.sharma@somebrand.in"));
    }

    #[test]
    fn test_blacklisted_and_typo_domains_are_rejected() {
        for email in [
            "creator@example.com",
            "creator@yourdomain.com",
            "creator@gamil.com",
            "creator@mailinator.com",
        ] {
            assert!(!is_valid_email(email), "{} should be rejected", email);
        }
        assert!(is_valid_email("creator@gmail.com"));
    }

    #[test]
    fn test_structural_rejects_missing_tld_and_short_parts() {
        // 无有效TLD（如unicode前缀污染的句柄误匹配）
        assert!(!is_valid_email("u2068@dr.poojakvlogs"));
        assert!(!is_valid_email("a@b.co"));
        assert!(!is_valid_email(".dot@start.com"));
    }

    #[test]
    fn test_extract_contacts_drops_placeholder_emails() {
        let info = extract_contacts("write to noreply@brand.com or really.me@brand.com");
        assert_eq!(info.emails, vec!["really.me@brand.com".to_string()]);
    }

    #[test]
    fn test_classifies_social_links() {
        let info = extract_contacts(
            "IG: https://instagram.com/somecreator TW: https://x.com/someone \
             site: https://example.com/about",
        );
        assert_eq!(
            info.social_links,
            vec![
                ("instagram".to_string(), "https://instagram.com/somecreator".to_string()),
                ("twitter".to_string(), "https://x.com/someone".to_string()),
            ]
        );
        assert_eq!(info.websites, vec!["https://example.com/about".to_string()]);
    }

    #[test]
    fn test_video_platform_links_are_not_websites() {
        let info = extract_contacts("https://youtube.com/@me https://youtu.be/abc123");
        assert!(info.websites.is_empty());
        assert!(info.social_links.is_empty());
    }

    #[test]
    fn test_instagram_username_parsing() {
        assert_eq!(
            instagram_username("https://instagram.com/some.creator"),
            Some("some.creator".to_string())
        );
        assert_eq!(instagram_username("https://instagram.com/p/Cxyz123"), None);
        assert_eq!(instagram_username("https://example.com/whatever"), None);
    }

    #[test]
    fn test_merge_preserves_order_and_dedups() {
        let mut a = extract_contacts("first@x.com https://instagram.com/a");
        let b = extract_contacts("first@x.com second@x.com https://instagram.com/a");
        a.merge(b);
        assert_eq!(
            a.emails,
            vec!["first@x.com".to_string(), "second@x.com".to_string()]
        );
        assert_eq!(a.social_links.len(), 1);
    }
}
