//! Everything that knows how the site lays out its pages lives here.
//!
//! One entry point per page type: [`Parser::listing`] for the monster table and
//! [`Parser::ability_scores`] for a monster's detail page. Both work on raw HTML
//! so tests can feed synthetic markup.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, RowFailure, ScrapeError};
use crate::record::{AbilityScores, MonsterRecord};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css}: {e}"))
}

static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static NAME_INPUT: LazyLock<Selector> = LazyLock::new(|| selector("input"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static CR: LazyLock<Selector> = LazyLock::new(|| selector("td.center"));
static KIND: LazyLock<Selector> = LazyLock::new(|| selector("td.col1"));
static SIZE: LazyLock<Selector> = LazyLock::new(|| selector("td.col2"));
// armor class and hit points share this class, in that order
static AC_HP: LazyLock<Selector> = LazyLock::new(|| selector("td.col3"));
static ALIGN: LazyLock<Selector> = LazyLock::new(|| selector("td.col4"));
static LEGENDARY: LazyLock<Selector> = LazyLock::new(|| selector("td.col5"));
static SPEED: LazyLock<Selector> = LazyLock::new(|| selector("td.col6"));
static SOURCE: LazyLock<Selector> = LazyLock::new(|| selector("td.colS"));

static ABILITY_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("div.carac"));
// three-letter abbreviation glued to the score, e.g. "STR10"
static SCORE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{Alphabetic}{3}(\d+)$").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

/// Result of parsing the listing page: good rows in document order, plus the
/// rows that were skipped and why.
#[derive(Debug, Default)]
pub struct ListingPage {
    pub records: Vec<MonsterRecord>,
    pub failures: Vec<RowFailure>,
}

#[derive(Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// Parses the monster table. The first `<tr>` is the header and is dropped.
    /// Detail links are resolved against `base`.
    #[instrument(skip_all)]
    pub fn listing(&self, html: &str, base: &Url) -> ListingPage {
        let document = Html::parse_document(html);
        let mut page = ListingPage::default();

        for (index, row) in document.select(&ROW).enumerate().skip(1) {
            // spacer rows carry no cells
            if row.select(&CELL).next().is_none() {
                continue;
            }
            match self.listing_row(row, base) {
                Ok(record) => page.records.push(record),
                Err(e) => page.failures.push(RowFailure::new(format!("row {}", index), &e)),
            }
        }

        debug!(
            "parsed {} rows, {} skipped",
            page.records.len(),
            page.failures.len()
        );
        page
    }

    fn listing_row(&self, row: ElementRef, base: &Url) -> Result<MonsterRecord> {
        let name = row
            .select(&NAME_INPUT)
            .next()
            .and_then(|input| input.value().attr("value"))
            .map(|v| v.trim().to_string())
            .ok_or_else(|| ScrapeError::parse("missing name input"))?;

        let url = match row.select(&LINK).next() {
            Some(anchor) => match anchor.value().attr("href").map(str::trim) {
                Some(href) if !href.is_empty() => Some(
                    base.join(href)
                        .map_err(|e| ScrapeError::parse(format!("{name}: bad link {href}: {e}")))?
                        .to_string(),
                ),
                _ => None,
            },
            None => None,
        };

        Ok(MonsterRecord {
            url,
            cr: required(row, &CR, 0, &name, "challenge rating")?,
            kind: required(row, &KIND, 0, &name, "type")?,
            size: required(row, &SIZE, 0, &name, "size")?,
            ac: required(row, &AC_HP, 0, &name, "armor class")?,
            hp: required(row, &AC_HP, 1, &name, "hit points")?,
            speed: required(row, &SPEED, 0, &name, "speed")?,
            align: required(row, &ALIGN, 0, &name, "alignment")?,
            legendary: required(row, &LEGENDARY, 0, &name, "legendary marker")?,
            source: required(row, &SOURCE, 0, &name, "source")?,
            name,
            ..Default::default()
        })
    }

    /// Reads the six `div.carac` blocks of a detail page, STR through CHA.
    ///
    /// Each block renders as e.g. `STR10 (+0)`: the score is the first
    /// whitespace-separated token with its three-letter prefix removed.
    #[instrument(skip_all)]
    pub fn ability_scores(&self, html: &str) -> Result<AbilityScores> {
        let document = Html::parse_document(html);
        let blocks: Vec<String> = document
            .select(&ABILITY_BLOCK)
            .map(|block| block.text().collect::<String>())
            .collect();

        if blocks.len() != 6 {
            return Err(ScrapeError::parse(format!(
                "expected 6 ability blocks, found {}",
                blocks.len()
            )));
        }

        let mut scores: [String; 6] = Default::default();
        for (slot, text) in scores.iter_mut().zip(&blocks) {
            *slot = score_from_block(text)?;
        }

        Ok(AbilityScores::from_array(scores))
    }
}

/// Text of the `nth` cell matching `sel`, trimmed.
fn required(row: ElementRef, sel: &Selector, nth: usize, name: &str, what: &str) -> Result<String> {
    row.select(sel)
        .nth(nth)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ScrapeError::parse(format!("{name}: missing {what}")))
}

fn score_from_block(text: &str) -> Result<String> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| ScrapeError::parse("empty ability block"))?;
    SCORE_TOKEN
        .captures(token)
        .and_then(|caps| caps.get(1))
        .map(|score| score.as_str().to_string())
        .ok_or_else(|| ScrapeError::parse(format!("unexpected ability token {token:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "<tr><th>Name</th><th>CR</th><th>Type</th></tr>";

    fn base() -> Url {
        Url::parse("https://www.aidedd.org/dnd-filters/monsters.php").unwrap()
    }

    fn row(name: &str, link: Option<&str>, source: Option<&str>) -> String {
        let anchor = match link {
            Some(href) => format!("<a href=\"{href}\">{name}</a>"),
            None => name.to_string(),
        };
        let source = source
            .map(|s| format!("<td class=\"colS\">{s}</td>"))
            .unwrap_or_default();
        format!(
            "<tr><td><input type=\"checkbox\" value=\"{name}\"></td><td>{anchor}</td>\
             <td class=\"center\">1/2</td><td class=\"col1\">humanoid</td><td class=\"col2\">M</td>\
             <td class=\"col3\">13 (hide armor)</td><td class=\"col3\">11 (2d8 + 2)</td>\
             <td class=\"col6\">30 ft.</td><td class=\"col4\">neutral evil</td>\
             <td class=\"col5\"></td>{source}</tr>"
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table>{HEADER}{}</table></body></html>",
            rows.concat()
        )
    }

    fn detail(blocks: &[&str]) -> String {
        let blocks: String = blocks
            .iter()
            .map(|b| {
                let (abbr, rest) = b.split_at(3);
                format!("<div class=\"carac\"><strong>{abbr}</strong><br>{rest}</div>")
            })
            .collect();
        format!("<html><body><div class=\"bloc\">{blocks}</div></body></html>")
    }

    #[test]
    fn listing_maps_each_marker_to_its_column() {
        let html = page(&[row("Gnoll", Some("https://www.aidedd.org/dnd/monstres.php?vo=gnoll"), Some("MM"))]);
        let parsed = Parser.listing(&html, &base());

        assert!(parsed.failures.is_empty());
        let gnoll = &parsed.records[0];
        assert_eq!(gnoll.name, "Gnoll");
        assert_eq!(
            gnoll.url.as_deref(),
            Some("https://www.aidedd.org/dnd/monstres.php?vo=gnoll")
        );
        assert_eq!(gnoll.cr, "1/2");
        assert_eq!(gnoll.kind, "humanoid");
        assert_eq!(gnoll.size, "M");
        assert_eq!(gnoll.ac, "13 (hide armor)");
        assert_eq!(gnoll.hp, "11 (2d8 + 2)");
        assert_eq!(gnoll.speed, "30 ft.");
        assert_eq!(gnoll.align, "neutral evil");
        assert_eq!(gnoll.legendary, "");
        assert_eq!(gnoll.source, "MM");
        assert_eq!(gnoll.strength, None);
    }

    #[test]
    fn listing_without_anchor_has_no_url() {
        let parsed = Parser.listing(&page(&[row("Bandit", None, Some("MM"))]), &base());
        assert_eq!(parsed.records[0].url, None);
    }

    #[test]
    fn listing_resolves_relative_links() {
        let parsed = Parser.listing(&page(&[row("Orc", Some("../dnd/monstres.php?vo=orc"), Some("MM"))]), &base());
        assert_eq!(
            parsed.records[0].url.as_deref(),
            Some("https://www.aidedd.org/dnd/monstres.php?vo=orc")
        );
    }

    #[test]
    fn listing_skips_row_missing_a_marker() {
        let html = page(&[
            row("Kobold", None, Some("MM")),
            row("Broken", None, None),
            row("Goblin", None, Some("MM")),
        ]);
        let parsed = Parser.listing(&html, &base());

        let names: Vec<_> = parsed.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Kobold", "Goblin"]);
        assert_eq!(parsed.failures.len(), 1);
        assert_eq!(parsed.failures[0].row, "row 2");
        assert!(parsed.failures[0].reason.contains("Broken: missing source"));
    }

    #[test]
    fn listing_ignores_rows_without_cells() {
        let html = page(&["<tr><th>spacer</th></tr>".to_string(), row("Imp", None, Some("MM"))]);
        let parsed = Parser.listing(&html, &base());
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.failures.is_empty());
    }

    #[test]
    fn ability_scores_strip_the_abbreviation() {
        let html = detail(&[
            "STR10 (+0)",
            "DEX14 (+2)",
            "CON12 (+1)",
            "INT8 (-1)",
            "WIS10 (+0)",
            "CHA6 (-2)",
        ]);
        let scores = Parser.ability_scores(&html).unwrap();

        assert_eq!(scores.strength, "10");
        assert_eq!(scores.dexterity, "14");
        assert_eq!(scores.constitution, "12");
        assert_eq!(scores.intelligence, "8");
        assert_eq!(scores.wisdom, "10");
        assert_eq!(scores.charisma, "6");
    }

    #[test]
    fn ability_scores_accept_localized_abbreviations() {
        let html = detail(&["FOR21 (+5)", "DEX9 (-1)", "CON15 (+2)", "INT18 (+4)", "SAG15 (+2)", "CHA18 (+4)"]);
        assert_eq!(Parser.ability_scores(&html).unwrap().strength, "21");
    }

    #[test]
    fn ability_scores_need_exactly_six_blocks() {
        let html = detail(&["STR10 (+0)", "DEX14 (+2)", "CON12 (+1)", "INT8 (-1)", "WIS10 (+0)"]);
        let err = Parser.ability_scores(&html).unwrap_err();
        assert!(err.to_string().contains("found 5"));
    }

    #[test]
    fn ability_scores_reject_malformed_token() {
        let html = detail(&["STR-- (+0)", "DEX14 (+2)", "CON12 (+1)", "INT8 (-1)", "WIS10 (+0)", "CHA6 (-2)"]);
        assert!(matches!(
            Parser.ability_scores(&html),
            Err(ScrapeError::Parse(_))
        ));
    }
}
