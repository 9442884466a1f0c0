//! Message template resolution.
//!
//! Turns a raw `{tag}`-style template into final display text in a fixed
//! pass order: per-locale translation first (translations may themselves
//! contain placeholders), then built-in placeholder substitution, newline
//! collapsing, and finally color-tag expansion. Resolution is total -- a tag
//! nobody recognizes stays in the output verbatim and is never an error.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Tag name -> locale code -> localized text.
pub type LocalizationTable = HashMap<String, HashMap<String, String>>;

/// Matches `{tagname}` tokens. Braces are never nested or escaped, so a tag
/// name is any run of characters other than `}`.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]*)\}").expect("tag pattern is a valid regex"));

/// Paragraph separator used by single-line rendering surfaces in place of
/// literal newlines.
const PARAGRAPH_SEPARATOR: &str = "\u{2029}";

/// Per-resolution facts consumed by the built-in placeholders.
///
/// Computed fresh for every resolve call and never stored: occupancy and the
/// clock change between firings.
#[derive(Debug, Clone)]
pub struct PlaceholderContext<'a> {
    pub server_name: &'a str,
    pub server_sub_name: &'a str,
    /// Raw map identifier as the host reports it (e.g. `de_dust2`).
    pub map_name: &'a str,
    /// Raw map identifier -> friendly display name. Only an explicit entry
    /// rewrites the map name; otherwise the raw identifier stands.
    pub map_display_names: &'a HashMap<String, String>,
    pub ip: &'a str,
    pub port: u16,
    pub max_participants: u32,
    pub occupied: u32,
    /// Requester display name; populated for welcome resolution only.
    pub participant_name: Option<&'a str>,
    /// Wall-clock instant for `{TIME}` and `{DATE}`.
    pub now: chrono::DateTime<chrono::Local>,
}

/// Resolve `template` for one requester.
///
/// `locale` is the requester's resolved locale; translations missing that
/// locale fall back to `default_locale`, and tags missing both stay verbatim.
pub fn resolve(
    template: &str,
    locale: &str,
    localization: &LocalizationTable,
    default_locale: &str,
    ctx: &PlaceholderContext<'_>,
) -> String {
    let localized = apply_localization(template, locale, localization, default_locale);
    let substituted = apply_builtins(localized, ctx);
    apply_color_tags(substituted)
}

/// Localization pass: per-distinct-tag, replacing every literal occurrence of
/// the matched `{tag}` substring (a repeated tag is substituted everywhere,
/// not just at its first position).
fn apply_localization(
    template: &str,
    locale: &str,
    localization: &LocalizationTable,
    default_locale: &str,
) -> String {
    if localization.is_empty() {
        return template.to_string();
    }

    let mut resolved = template.to_string();
    let mut seen: Vec<&str> = Vec::new();

    for capture in TAG_PATTERN.captures_iter(template) {
        let (Some(token), Some(name)) = (capture.get(0), capture.get(1)) else {
            continue;
        };
        if seen.contains(&name.as_str()) {
            continue;
        }
        seen.push(name.as_str());

        let Some(translations) = localization.get(name.as_str()) else {
            continue;
        };

        let text = translations
            .get(locale)
            .or_else(|| translations.get(default_locale));
        if let Some(text) = text {
            resolved = resolved.replace(token.as_str(), text);
        }
    }

    resolved
}

/// Built-in placeholder pass, then newline collapsing.
///
/// The map display-name override fires after `{MAP}` substitution and only
/// rewrites the literal raw-identifier substring, so a translation that spells
/// out the raw map id by hand gets the friendly name too.
fn apply_builtins(text: String, ctx: &PlaceholderContext<'_>) -> String {
    let mut resolved = text
        .replace("{MAP}", ctx.map_name)
        .replace("{TIME}", &ctx.now.format("%H:%M:%S").to_string())
        .replace("{DATE}", &ctx.now.format("%d.%m.%Y").to_string())
        .replace("{SERVERNAME}", ctx.server_name)
        .replace("{SERVERSUBNAME}", ctx.server_sub_name)
        .replace("{IP}", ctx.ip)
        .replace("{PORT}", &ctx.port.to_string())
        .replace("{MAXPLAYERS}", &ctx.max_participants.to_string())
        .replace("{PLAYERS}", &ctx.occupied.to_string());

    if let Some(name) = ctx.participant_name {
        resolved = resolved.replace("{PLAYERNAME}", name);
    }

    if !ctx.map_name.is_empty() {
        if let Some(display) = ctx.map_display_names.get(ctx.map_name) {
            resolved = resolved.replace(ctx.map_name, display);
        }
    }

    resolved.replace('\n', PARAGRAPH_SEPARATOR)
}

/// Fixed chat color palette.
///
/// Tokens map onto the rendering surface's one-byte chat escape convention;
/// tokens outside the palette are left as literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatColor {
    Default,
    White,
    DarkRed,
    Green,
    LightYellow,
    LightBlue,
    Olive,
    Lime,
    Red,
    LightPurple,
    Purple,
    Grey,
    Yellow,
    Gold,
    Silver,
    Blue,
    DarkBlue,
    BlueGrey,
    Magenta,
    LightRed,
    Orange,
}

impl ChatColor {
    pub const ALL: [Self; 21] = [
        Self::Default,
        Self::White,
        Self::DarkRed,
        Self::Green,
        Self::LightYellow,
        Self::LightBlue,
        Self::Olive,
        Self::Lime,
        Self::Red,
        Self::LightPurple,
        Self::Purple,
        Self::Grey,
        Self::Yellow,
        Self::Gold,
        Self::Silver,
        Self::Blue,
        Self::DarkBlue,
        Self::BlueGrey,
        Self::Magenta,
        Self::LightRed,
        Self::Orange,
    ];

    /// The template token recognized for this color.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Default => "{DEFAULT}",
            Self::White => "{WHITE}",
            Self::DarkRed => "{DARKRED}",
            Self::Green => "{GREEN}",
            Self::LightYellow => "{LIGHTYELLOW}",
            Self::LightBlue => "{LIGHTBLUE}",
            Self::Olive => "{OLIVE}",
            Self::Lime => "{LIME}",
            Self::Red => "{RED}",
            Self::LightPurple => "{LIGHTPURPLE}",
            Self::Purple => "{PURPLE}",
            Self::Grey => "{GREY}",
            Self::Yellow => "{YELLOW}",
            Self::Gold => "{GOLD}",
            Self::Silver => "{SILVER}",
            Self::Blue => "{BLUE}",
            Self::DarkBlue => "{DARKBLUE}",
            Self::BlueGrey => "{BLUEGREY}",
            Self::Magenta => "{MAGENTA}",
            Self::LightRed => "{LIGHTRED}",
            Self::Orange => "{ORANGE}",
        }
    }

    /// Chat escape character understood by the rendering surface.
    pub const fn escape(self) -> &'static str {
        match self {
            Self::Default | Self::White => "\u{01}",
            Self::DarkRed => "\u{02}",
            Self::LightYellow | Self::LightBlue | Self::LightPurple => "\u{03}",
            Self::Green => "\u{04}",
            Self::Olive => "\u{05}",
            Self::Lime => "\u{06}",
            Self::Red => "\u{07}",
            Self::Grey => "\u{08}",
            Self::Yellow => "\u{09}",
            Self::Silver | Self::BlueGrey => "\u{0A}",
            Self::Blue => "\u{0B}",
            Self::DarkBlue => "\u{0C}",
            Self::Purple | Self::Magenta => "\u{0E}",
            Self::LightRed => "\u{0F}",
            Self::Gold | Self::Orange => "\u{10}",
        }
    }
}

fn apply_color_tags(text: String) -> String {
    let mut resolved = text;
    for color in ChatColor::ALL {
        if resolved.contains(color.token()) {
            resolved = resolved.replace(color.token(), color.escape());
        }
    }
    resolved
}
