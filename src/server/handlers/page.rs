use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::core::config::{ServerConfig, ThemeConfig};
use crate::state::AppState;

const PAGE_TEMPLATE: &str = include_str!("../page.html");

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state.config.server, &state.config.theme))
}

pub fn render_page(server: &ServerConfig, theme: &ThemeConfig) -> String {
    let (background, paper, text) = if theme.dark_mode {
        (
            theme.color_background_dark.as_str(),
            theme.color_paper_dark.as_str(),
            "#E8E8EA",
        )
    } else {
        ("#FFFFFF", "#F4F4F6", "#1C1C1D")
    };

    PAGE_TEMPLATE
        .replace("{{title}}", &escape_html(&server.title))
        .replace("{{color_primary}}", &theme.color_primary)
        .replace("{{color_secondary}}", &theme.color_secondary)
        .replace("{{color_background}}", background)
        .replace("{{color_paper}}", paper)
        .replace("{{color_text}}", text)
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
