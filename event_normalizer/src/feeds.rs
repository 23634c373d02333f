//! The smaller tabs of the dashboard spreadsheet: headline metrics and news
//! links. They go through the same tolerant field resolution as events.

use log::info;

use crate::config::{FieldSpec, Sheet};
use crate::resolver::RowView;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub unit: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
}

pub const MISSING_METRIC: &str = "—";
pub const UNTITLED_NEWS: &str = "Sin título";
pub const MISSING_URL: &str = "#";

/// Field specs of the metrics tab: label, value and unit.
pub fn metric_specs() -> [FieldSpec; 3] {
    [
        FieldSpec::new(&[], &["metrica", "metric"], &[]),
        FieldSpec::new(&[], &["valor", "value"], &[]),
        FieldSpec::new(&[], &["unidad", "unit"], &[]),
    ]
}

/// Field specs of the news tab: title, link and source.
pub fn news_specs() -> [FieldSpec; 3] {
    [
        FieldSpec::new(&[], &["titulo", "title"], &[]),
        FieldSpec::new(&[], &["url", "link", "enlace"], &[]),
        FieldSpec::new(&[], &["fuente", "source"], &[]),
    ]
}

pub fn normalize_metrics(sheet: &Sheet) -> Vec<Metric> {
    let [label, value, unit] = metric_specs();
    let headers = sheet.headers.as_deref();
    let res: Vec<Metric> = sheet
        .rows
        .iter()
        .map(|row| {
            let view = RowView::new(row);
            Metric {
                label: or_default(view.resolve(headers, &label), MISSING_METRIC),
                value: or_default(view.resolve(headers, &value), MISSING_METRIC),
                unit: view.resolve(headers, &unit),
            }
        })
        .collect();
    info!("normalize_metrics: {} metrics", res.len());
    res
}

pub fn normalize_news(sheet: &Sheet) -> Vec<NewsItem> {
    let [title, url, source] = news_specs();
    let headers = sheet.headers.as_deref();
    let res: Vec<NewsItem> = sheet
        .rows
        .iter()
        .map(|row| {
            let view = RowView::new(row);
            NewsItem {
                title: or_default(view.resolve(headers, &title), UNTITLED_NEWS),
                url: or_default(view.resolve(headers, &url), MISSING_URL),
                source: view.resolve(headers, &source),
            }
        })
        .collect();
    info!("normalize_news: {} items", res.len());
    res
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawRow;

    #[test]
    fn metrics_in_either_language() {
        let sheet = Sheet::new(vec![
            RawRow::from_pairs(vec![("Métrica", "Users"), ("Valor", "1200"), ("Unidad", "")]),
            RawRow::from_pairs(vec![("Metric", "Posts"), ("Value", "35"), ("Unit", "k")]),
            RawRow::from_pairs(vec![("Other", "x")]),
        ]);
        let metrics = normalize_metrics(&sheet);
        assert_eq!(
            metrics,
            vec![
                Metric {
                    label: "Users".to_string(),
                    value: "1200".to_string(),
                    unit: "".to_string()
                },
                Metric {
                    label: "Posts".to_string(),
                    value: "35".to_string(),
                    unit: "k".to_string()
                },
                Metric {
                    label: "—".to_string(),
                    value: "—".to_string(),
                    unit: "".to_string()
                },
            ]
        );
    }

    #[test]
    fn news_defaults() {
        let sheet = Sheet::new(vec![
            RawRow::from_pairs(vec![
                ("Título", "Hive Fest"),
                ("URL", "https://hive.io"),
                ("Fuente", "Hive"),
            ]),
            RawRow::from_pairs(vec![("Link", "https://peakd.com")]),
        ]);
        let news = normalize_news(&sheet);
        assert_eq!(news[0].title, "Hive Fest");
        assert_eq!(news[0].source, "Hive");
        assert_eq!(news[1].title, "Sin título");
        assert_eq!(news[1].url, "https://peakd.com");
        assert_eq!(news[1].source, "");
        assert!(normalize_news(&Sheet::default()).is_empty());
    }
}
