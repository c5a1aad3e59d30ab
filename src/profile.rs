//! Site profiles.
//!
//! A [`SiteProfile`] is resolved once per call from the page's domain and
//! threaded through the pipeline inside a [`SiteContext`]. Components ask
//! the profile what to do instead of matching domain strings themselves.

use std::time::Duration;

use url::Url;

use crate::options::Options;
use crate::url_utils;

/// Known-domain behavior variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteProfile {
    /// Any other site.
    Generic,
    /// English web-novel hosts: generic pipeline in novel scoring mode.
    NovelHost,
    /// metruyencv.com: specialized extractor, profiled navigation, Vietnamese cleaning.
    Metruyencv,
    /// truyenfull.vn: generic pipeline with host selectors first, Vietnamese cleaning.
    Truyenfull,
    /// Other Vietnamese novel readers: generic pipeline plus Vietnamese cleaning.
    VietnameseNovel,
    /// truyensextv.com: slow legacy host with a broken certificate chain.
    Truyensextv,
}

/// Locale-specific cleaner selected by a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// Vietnamese reader chrome.
    Vietnamese,
}

/// Domain substrings checked in order; first hit wins.
const PROFILE_DOMAINS: &[(&str, SiteProfile)] = &[
    ("metruyencv.com", SiteProfile::Metruyencv),
    ("truyenfull.vn", SiteProfile::Truyenfull),
    ("truyensextv", SiteProfile::Truyensextv),
    ("truyenyy.com", SiteProfile::VietnameseNovel),
    ("truyencv.com", SiteProfile::VietnameseNovel),
    ("truyenki.com", SiteProfile::VietnameseNovel),
    ("wuxiaworld.com", SiteProfile::NovelHost),
    ("royalroad.com", SiteProfile::NovelHost),
    ("novelupdates.com", SiteProfile::NovelHost),
    ("webnovel.com", SiteProfile::NovelHost),
];

/// Domain fragments of news publishers; such pages get blog/news selectors.
const NEWS_DOMAINS: &[&str] = &["news.", "cnn.", "bbc.", "nytimes.", "theguardian.", "reuters."];

impl SiteProfile {
    /// Resolves the profile for a host name.
    #[must_use]
    pub fn for_domain(domain: &str) -> Self {
        let domain = domain.to_ascii_lowercase();
        PROFILE_DOMAINS
            .iter()
            .find(|(needle, _)| domain.contains(needle))
            .map_or(Self::Generic, |(_, profile)| *profile)
    }

    /// Whether the specialized extractor replaces discovery and filtering.
    #[must_use]
    pub fn has_specialized_extractor(self) -> bool {
        matches!(self, Self::Metruyencv)
    }

    /// Whether navigation uses the four-step profiled cascade.
    #[must_use]
    pub fn has_profiled_navigation(self) -> bool {
        matches!(self, Self::Metruyencv)
    }

    /// Whether blocks are scored in novel mode.
    #[must_use]
    pub fn is_novel(self) -> bool {
        matches!(self, Self::NovelHost | Self::Metruyencv | Self::Truyenfull)
    }

    /// Locale cleaner to run after the deep cleaner.
    #[must_use]
    pub fn locale(self) -> Option<Locale> {
        match self {
            Self::Metruyencv | Self::Truyenfull | Self::VietnameseNovel => Some(Locale::Vietnamese),
            Self::Generic | Self::NovelHost | Self::Truyensextv => None,
        }
    }

    /// Hosts known to be slow or unstable get a higher timeout floor.
    #[must_use]
    pub fn is_slow(self) -> bool {
        matches!(self, Self::Metruyencv | Self::Truyensextv)
    }

    /// Whether the first request verifies TLS certificates.
    #[must_use]
    pub fn verifies_tls_initially(self) -> bool {
        !matches!(self, Self::Truyensextv)
    }

    /// Container selectors tried before every other discovery selector.
    #[must_use]
    pub fn prepended_selectors(self) -> &'static [&'static str] {
        match self {
            Self::Metruyencv | Self::Truyenfull => &[".nh-read__content", "#article.chapter-content"],
            Self::Truyensextv => &[".chapter-c", ".chapter-content", "#chapter-content"],
            Self::Generic | Self::NovelHost | Self::VietnameseNovel => &[],
        }
    }

    /// Effective (connect, read) timeouts for this profile.
    #[must_use]
    pub fn timeouts(self, options: &Options) -> (Duration, Duration) {
        let mut timeout = options.timeout.max(options.min_timeout);
        if self.is_slow() {
            timeout = timeout.max(options.slow_domain_timeout);
        }
        (timeout, timeout.min(options.max_read_timeout))
    }

    /// Short label for traces.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::NovelHost => "novel host",
            Self::Metruyencv => "metruyencv",
            Self::Truyenfull => "truyenfull",
            Self::VietnameseNovel => "vietnamese novel",
            Self::Truyensextv => "truyensextv",
        }
    }
}

/// Per-call site information, resolved once and passed explicitly.
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Page URL (after redirects when fetched).
    pub url: Url,
    /// Host name of the page.
    pub domain: String,
    /// `scheme://host` of the page, used to resolve relative links.
    pub base_url: String,
    /// Resolved profile.
    pub profile: SiteProfile,
    /// Domain matches a news publisher.
    pub is_news: bool,
}

impl SiteContext {
    /// Builds the context for a page URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        let domain = url.host_str().unwrap_or_default().to_string();
        let base_url = url_utils::get_base_url(url.as_str());
        let profile = SiteProfile::for_domain(&domain);
        let lowered = domain.to_ascii_lowercase();
        let is_news = NEWS_DOMAINS.iter().any(|d| lowered.contains(d));
        Self {
            url,
            domain,
            base_url,
            profile,
            is_news,
        }
    }

    /// Parses `url` and builds its context.
    ///
    /// Returns `None` for anything that is not an absolute http(s) URL.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        url_utils::parse_url(url).map(Self::new)
    }

    /// Whether blocks are scored in novel mode.
    #[must_use]
    pub fn is_novel(&self) -> bool {
        self.profile.is_novel()
    }
}
