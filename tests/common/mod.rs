#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use dnd_monster_scrape::config::Settings;
use dnd_monster_scrape::table::write_table;
use dnd_monster_scrape::{AbilityScores, MonsterCrawler, MonsterRecord, Pacing};

pub fn crawler() -> MonsterCrawler {
    let settings = Settings {
        timeout_secs: 5,
        ..Settings::default()
    };
    MonsterCrawler::new(&settings).expect("client")
}

/// No waiting, but remembers how often it was asked.
#[derive(Default)]
pub struct CountingPacer {
    pub calls: usize,
}

impl Pacing for CountingPacer {
    fn next_delay(&mut self) -> Duration {
        self.calls += 1;
        Duration::ZERO
    }
}

pub struct Monster<'a> {
    pub name: &'a str,
    pub href: Option<&'a str>,
    pub cr: &'a str,
    pub source: &'a str,
}

pub fn listing_row(m: &Monster) -> String {
    let name_cell = match m.href {
        Some(href) => format!("<a href=\"{href}\">{}</a>", m.name),
        None => m.name.to_string(),
    };
    format!(
        "<tr><td><input type=\"checkbox\" name=\"select\" value=\"{name}\"></td>\
         <td class=\"item\">{name_cell}</td><td class=\"center\">{cr}</td>\
         <td class=\"col1\">type-{name}</td><td class=\"col2\">L</td>\
         <td class=\"col3\">ac-{name}</td><td class=\"col3\">hp-{name}</td>\
         <td class=\"col6\">speed-{name}</td><td class=\"col4\">align-{name}</td>\
         <td class=\"col5\">legendary-{name}</td><td class=\"colS\">{source}</td></tr>",
        name = m.name,
        cr = m.cr,
        source = m.source,
    )
}

pub fn listing_page(rows: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><body><table id=\"liste\">\
         <tr><th></th><th>Name</th><th>CR</th><th>Type</th><th>Size</th><th>AC</th>\
         <th>HP</th><th>Speed</th><th>Align</th><th>Legendary</th><th>Source</th></tr>\
         {}</table></body></html>",
        rows.concat()
    )
}

/// Detail page with one `div.carac` per entry, rendered like the site does.
pub fn detail_page(blocks: &[(&str, &str)]) -> String {
    let blocks: String = blocks
        .iter()
        .map(|(abbr, rest)| format!("<div class=\"carac\"><strong>{abbr}</strong><br>{rest}</div>"))
        .collect();
    format!("<html><body><div class=\"jaune\">{blocks}</div></body></html>")
}

pub fn full_detail_page(str_score: u32) -> String {
    let strength = format!("{str_score} (+0)");
    detail_page(&[
        ("STR", strength.as_str()),
        ("DEX", "14 (+2)"),
        ("CON", "12 (+1)"),
        ("INT", "8 (-1)"),
        ("WIS", "10 (+0)"),
        ("CHA", "6 (-2)"),
    ])
}

pub fn record(name: &str, url: Option<String>, strength: Option<&str>) -> MonsterRecord {
    let mut record = MonsterRecord {
        name: name.to_string(),
        url,
        cr: "1".to_string(),
        kind: "beast".to_string(),
        size: "M".to_string(),
        ac: "12".to_string(),
        hp: "11 (2d8 + 2)".to_string(),
        speed: "30 ft.".to_string(),
        align: "unaligned".to_string(),
        legendary: String::new(),
        source: "MM".to_string(),
        ..Default::default()
    };
    if let Some(v) = strength {
        record.set_ability_scores(AbilityScores::from_array(
            [v, "11", "12", "13", "14", "15"].map(str::to_string),
        ));
    }
    record
}

pub async fn seed_table(path: &Path, records: &[MonsterRecord]) {
    write_table(path, records).await.expect("seed table");
}
