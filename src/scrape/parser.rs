//! Team page parser.
//!
//! Extracts the ranking, roster, news and upcoming matches from the raw HTML of
//! the team statistics page. Missing markup never fails the parse: the
//! affected field degrades to "N/A" or an empty list.

use scraper::{ElementRef, Html, Selector};

use crate::errors::AppError;
use crate::models::{NewsLink, TeamSnapshot, UpcomingMatch, NOT_AVAILABLE};

/// News and match lists are capped at this many entries.
pub const MAX_LISTED: usize = 5;

const RANKING: &str = "div.profile-team-stat";
const PLAYER_NAME: &str = "div.playerFlagName";
const NEWS_ARTICLE: &str = "a.subTab-newsArticle";
const UPCOMING_MATCH: &str = "div.upcomingMatch";
const MATCH_OPPONENT: &str = "div.matchTeam.team2";
const MATCH_TIME: &str = "div.matchTime";
const MATCH_EVENT: &str = "div.matchEventName";
const MATCH_LINK: &str = "a";

/// Base URLs that relative hrefs are appended to.
#[derive(Debug, Clone)]
pub struct PageLinks {
    /// Prefix for match links, e.g. `https://www.hltv.org`.
    pub site_base: String,
    /// Prefix for news links.
    pub news_base: String,
}

struct Selectors {
    ranking: Selector,
    player_name: Selector,
    news_article: Selector,
    upcoming_match: Selector,
    match_opponent: Selector,
    match_time: Selector,
    match_event: Selector,
    match_link: Selector,
}

impl Selectors {
    fn compile() -> Result<Self, AppError> {
        Ok(Self {
            ranking: compile(RANKING)?,
            player_name: compile(PLAYER_NAME)?,
            news_article: compile(NEWS_ARTICLE)?,
            upcoming_match: compile(UPCOMING_MATCH)?,
            match_opponent: compile(MATCH_OPPONENT)?,
            match_time: compile(MATCH_TIME)?,
            match_event: compile(MATCH_EVENT)?,
            match_link: compile(MATCH_LINK)?,
        })
    }
}

fn compile(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css)
        .map_err(|e| AppError::Internal(format!("Invalid selector {:?}: {}", css, e)))
}

/// Parser for the team statistics page.
pub struct PageParser {
    selectors: Selectors,
    links: PageLinks,
}

impl PageParser {
    pub fn new(links: PageLinks) -> Result<Self, AppError> {
        Ok(Self {
            selectors: Selectors::compile()?,
            links,
        })
    }

    /// Parse a full HTML document into a snapshot.
    pub fn parse(&self, html: &str) -> TeamSnapshot {
        let document = Html::parse_document(html);

        let snapshot = TeamSnapshot {
            ranking: self.ranking(&document),
            roster: self.roster(&document),
            news: self.news(&document),
            upcoming_matches: self.upcoming_matches(&document),
        };

        tracing::debug!(
            ranking = %snapshot.ranking,
            players = snapshot.roster.len(),
            news = snapshot.news.len(),
            matches = snapshot.upcoming_matches.len(),
            "Parsed team page"
        );
        snapshot
    }

    fn ranking(&self, document: &Html) -> String {
        match document.select(&self.selectors.ranking).next() {
            Some(el) => text_of(&el),
            None => {
                tracing::debug!("Ranking marker {} missing", RANKING);
                NOT_AVAILABLE.to_string()
            }
        }
    }

    fn roster(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.selectors.player_name)
            .map(|el| text_of(&el))
            .collect()
    }

    fn news(&self, document: &Html) -> Vec<NewsLink> {
        document
            .select(&self.selectors.news_article)
            .take(MAX_LISTED)
            .filter_map(|el| {
                let Some(href) = el.value().attr("href") else {
                    tracing::debug!("News article without href skipped");
                    return None;
                };
                Some(NewsLink {
                    title: text_of(&el),
                    link: format!("{}{}", self.links.news_base, href),
                })
            })
            .collect()
    }

    fn upcoming_matches(&self, document: &Html) -> Vec<UpcomingMatch> {
        document
            .select(&self.selectors.upcoming_match)
            .take(MAX_LISTED)
            .filter_map(|el| {
                let parsed = self.upcoming_match(&el);
                if parsed.is_none() {
                    tracing::debug!("Incomplete upcoming match skipped");
                }
                parsed
            })
            .collect()
    }

    /// All four fields or nothing.
    fn upcoming_match(&self, el: &ElementRef) -> Option<UpcomingMatch> {
        let s = &self.selectors;
        let opponent = el.select(&s.match_opponent).next()?;
        let time = el.select(&s.match_time).next()?;
        let event_name = el.select(&s.match_event).next()?;
        let href = el.select(&s.match_link).next()?.value().attr("href")?;

        Some(UpcomingMatch {
            opponent: text_of(&opponent),
            time: text_of(&time),
            event_name: text_of(&event_name),
            link: format!("{}{}", self.links.site_base, href),
        })
    }
}

fn text_of(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
