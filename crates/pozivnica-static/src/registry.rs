//! Built-in layouts and their themes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::locale::DateStyle;

/// Layout used when none is named.
pub const DEFAULT_LAYOUT: &str = "classic";

const PRECONNECT: &str = r#"<link rel="preconnect" href="https://fonts.googleapis.com">
<link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>"#;

const CLASSIC_SHARED_STYLES: [&str; 4] = [
    "animations.css",
    "components.css",
    "backgrounds.css",
    "decorations.css",
];

/// Which configured duration a layout's previews live for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryKind {
    /// `preview.expiry_hours`
    Hours,
    /// `preview.expiry_days`
    Days,
}

/// A visual variant within a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme id, also the stylesheet directory and page file name
    pub id: String,

    /// Display name
    pub name: String,

    pub description: String,

    /// Font `<link>` tags, overriding the layout's
    #[serde(default)]
    pub fonts: Option<String>,

    /// Eight floating decoration icons
    #[serde(default)]
    pub icons: Vec<String>,
}

/// Everything needed to render one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub name: String,

    pub display_name: String,

    pub description: String,

    /// Base template, relative to the templates directory
    pub base_template: PathBuf,

    /// Directory holding `<theme>/style.css`, relative to the templates directory
    pub theme_dir: PathBuf,

    pub themes: Vec<ThemeConfig>,

    /// Font `<link>` tags shared by every theme
    pub fonts: String,

    /// Stylesheets inlined into every page, relative to the templates directory
    pub shared_styles: Vec<PathBuf>,

    /// Client script inlined into every page
    pub script: Option<PathBuf>,

    /// Add `class="theme-<id>"` to `<body>`
    pub body_theme_class: bool,

    /// Selector page icon
    pub emoji: String,

    /// Selector page `:root` variables
    pub css_vars: String,

    pub date_style: DateStyle,

    pub expiry: ExpiryKind,

    /// Suffix the output directory with `-<name>`
    pub suffix_output: bool,
}

impl LayoutConfig {
    /// A layout following the `base-<name>.html` / `themes-<name>/` convention.
    pub fn conventional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: name.to_string(),
            description: String::new(),
            base_template: PathBuf::from(format!("base-{name}.html")),
            theme_dir: PathBuf::from(format!("themes-{name}")),
            themes: Vec::new(),
            fonts: String::new(),
            shared_styles: Vec::new(),
            script: None,
            body_theme_class: false,
            emoji: "💌".to_string(),
            css_vars: BOTANICAL_VARS.to_string(),
            date_style: DateStyle::Nominative,
            expiry: ExpiryKind::Days,
            suffix_output: true,
        }
    }

    pub fn theme(&self, id: &str) -> Option<&ThemeConfig> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn theme_ids(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.id.as_str()).collect()
    }

    /// Directory name for a slug's artifact.
    pub fn output_name(&self, slug: &str) -> String {
        if self.suffix_output {
            format!("{slug}-{}", self.name)
        } else {
            slug.to_string()
        }
    }

    /// Font links for a theme.
    pub fn fonts_for<'a>(&'a self, theme: &'a ThemeConfig) -> &'a str {
        theme.fonts.as_deref().unwrap_or(&self.fonts)
    }

    fn apply(&mut self, o: LayoutOverride) {
        if let Some(v) = o.display_name {
            self.display_name = v;
        }
        if let Some(v) = o.description {
            self.description = v;
        }
        if let Some(v) = o.base_template {
            self.base_template = v;
        }
        if let Some(v) = o.theme_dir {
            self.theme_dir = v;
        }
        if let Some(v) = o.themes {
            self.themes = v;
        }
        if let Some(v) = o.fonts {
            self.fonts = v;
        }
        if let Some(v) = o.shared_styles {
            self.shared_styles = v;
        }
        if let Some(v) = o.script {
            self.script = Some(v);
        }
        if let Some(v) = o.body_theme_class {
            self.body_theme_class = v;
        }
        if let Some(v) = o.emoji {
            self.emoji = v;
        }
        if let Some(v) = o.css_vars {
            self.css_vars = v;
        }
        if let Some(v) = o.expiry {
            self.expiry = v;
        }
    }
}

/// Partial layout definition from the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutOverride {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub base_template: Option<PathBuf>,
    pub theme_dir: Option<PathBuf>,
    pub themes: Option<Vec<ThemeConfig>>,
    pub fonts: Option<String>,
    pub shared_styles: Option<Vec<PathBuf>>,
    pub script: Option<PathBuf>,
    pub body_theme_class: Option<bool>,
    pub emoji: Option<String>,
    pub css_vars: Option<String>,
    pub expiry: Option<ExpiryKind>,
}

/// All known layouts, by name.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, LayoutConfig>,
}

impl LayoutRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            layouts: BTreeMap::new(),
        }
    }

    /// The classic layout plus every built-in 2026 layout.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(classic());
        for layout in &LAYOUTS_2026 {
            registry.insert(layout.build());
        }
        registry
    }

    pub fn insert(&mut self, layout: LayoutConfig) {
        self.layouts.insert(layout.name.clone(), layout);
    }

    /// Merge a config-file override, creating the layout if it is new.
    pub fn apply_override(&mut self, name: &str, o: LayoutOverride) {
        self.layouts
            .entry(name.to_string())
            .or_insert_with(|| LayoutConfig::conventional(name))
            .apply(o);
    }

    pub fn get(&self, name: &str) -> Option<&LayoutConfig> {
        self.layouts.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.layouts.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutConfig> {
        self.layouts.values()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn google_fonts(families: &str) -> String {
    format!(
        "{PRECONNECT}\n<link href=\"https://fonts.googleapis.com/css2?{families}&display=swap\" rel=\"stylesheet\">"
    )
}

struct ClassicTheme {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    families: Option<&'static str>,
    icons: [&'static str; 8],
}

static CLASSIC_THEMES: [ClassicTheme; 10] = [
    ClassicTheme {
        id: "classic",
        name: "Класичан",
        description: "Традиционални елегантни дизајн са златним акцентима и орнаменталним детаљима",
        families: Some("family=Lato:wght@300;400;700&family=Playfair+Display:ital,wght@0,400;0,500;1,400"),
        icons: ["💍", "✨", "💐", "🕊️", "💒", "🥂", "💝", "🌹"],
    },
    ClassicTheme {
        id: "modern",
        name: "Модеран",
        description: "Савремени минималистички дизајн са чистим линијама и обиљем белог простора",
        families: Some("family=Montserrat:wght@100;200;300;400;500"),
        icons: ["◆", "○", "□", "△", "◇", "●", "■", "▲"],
    },
    ClassicTheme {
        id: "romantic",
        name: "Романтичан",
        description: "Нежни романтични дизајн у розе тоновима са цветним мотивима",
        families: Some("family=Great+Vibes&family=Raleway:wght@300;400;500;600"),
        icons: ["💕", "🌸", "💗", "🌷", "💖", "🌺", "💘", "🌼"],
    },
    ClassicTheme {
        id: "minimal",
        name: "Минималистички",
        description: "Ултра-чист дизајн фокусиран на типографију и садржај",
        families: None,
        icons: ["·", "·", "·", "·", "·", "·", "·", "·"],
    },
    ClassicTheme {
        id: "rustic",
        name: "Рустикални",
        description: "Топли природни дизајн инспирисан природом и рустичном естетиком",
        families: Some("family=Amatic+SC:wght@400;700&family=Josefin+Sans:wght@300;400;500;600"),
        icons: ["🌿", "🍃", "🌾", "🌻", "🌲", "🍂", "🌱", "🌳"],
    },
    ClassicTheme {
        id: "botanical",
        name: "Ботанички",
        description: "Елегантни зелени дизајн са еукалиптусом и лучним облицима",
        families: Some("family=Cormorant+Garamond:ital,wght@0,400;0,500;0,600;1,400&family=Montserrat:wght@300;400;500"),
        icons: ["🌿", "🍃", "🌱", "🪻", "🌾", "🪴", "🌿", "🍃"],
    },
    ClassicTheme {
        id: "moody",
        name: "Тамна Романса",
        description: "Драматичан тамни дизајн у бордо тоновима са златним акцентима",
        families: Some("family=Playfair+Display:ital,wght@0,400;0,500;1,400&family=Raleway:wght@300;400;500;600"),
        icons: ["✦", "◆", "✧", "❧", "✦", "◇", "✧", "❧"],
    },
    ClassicTheme {
        id: "gatsby",
        name: "Арт Деко",
        description: "Ретро гламур 1920-их са геометријским узорцима и злато-тегет палетом",
        families: Some("family=Poiret+One&family=Josefin+Sans:wght@300;400;500;600"),
        icons: ["◆", "✦", "◇", "★", "◆", "✧", "◇", "☆"],
    },
    ClassicTheme {
        id: "editorial",
        name: "Едиторијал",
        description: "Модерни часописни распоред са смелом типографијом и асиметричним дизајном",
        families: Some("family=Bebas+Neue&family=Inter:wght@300;400;500;600"),
        icons: ["●", "■", "▲", "◆", "○", "□", "△", "◇"],
    },
    ClassicTheme {
        id: "whimsical",
        name: "Илустровани",
        description: "Разигран илустровани дизајн са акварел текстурама и пастелним бојама",
        families: Some("family=Caveat:wght@400;500;600;700&family=Quicksand:wght@400;500;600"),
        icons: ["✿", "❀", "♡", "☆", "✿", "❀", "♥", "★"],
    },
];

/// Icons used when a theme defines none.
pub fn default_icons() -> &'static [&'static str; 8] {
    &CLASSIC_THEMES[0].icons
}

fn classic() -> LayoutConfig {
    let themes = CLASSIC_THEMES
        .iter()
        .map(|t| ThemeConfig {
            id: t.id.to_string(),
            name: t.name.to_string(),
            description: t.description.to_string(),
            fonts: Some(match t.families {
                Some(families) => google_fonts(families),
                None => "<!-- system fonts -->".to_string(),
            }),
            icons: t.icons.iter().map(|i| i.to_string()).collect(),
        })
        .collect();

    LayoutConfig {
        name: DEFAULT_LAYOUT.to_string(),
        display_name: "Класична".to_string(),
        description: "Десет класичних тема са анимацијама и украсима".to_string(),
        base_template: PathBuf::from("base.html"),
        theme_dir: PathBuf::from("themes"),
        themes,
        fonts: String::new(),
        shared_styles: CLASSIC_SHARED_STYLES.iter().map(PathBuf::from).collect(),
        script: Some(PathBuf::from("script.js")),
        body_theme_class: true,
        emoji: "💍".to_string(),
        css_vars: CLASSIC_VARS.to_string(),
        date_style: DateStyle::Full,
        expiry: ExpiryKind::Hours,
        suffix_output: false,
    }
}

struct Layout2026 {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    themes: [(&'static str, &'static str, &'static str); 2],
    families: &'static str,
    emoji: &'static str,
    css_vars: &'static str,
}

impl Layout2026 {
    fn build(&self) -> LayoutConfig {
        LayoutConfig {
            display_name: self.display_name.to_string(),
            description: self.description.to_string(),
            themes: self
                .themes
                .iter()
                .map(|(id, name, description)| ThemeConfig {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    fonts: None,
                    icons: Vec::new(),
                })
                .collect(),
            fonts: format!(
                "<link href=\"https://fonts.googleapis.com/css2?{}&display=swap\" rel=\"stylesheet\">",
                self.families
            ),
            emoji: self.emoji.to_string(),
            css_vars: self.css_vars.to_string(),
            ..LayoutConfig::conventional(self.name)
        }
    }
}

const CLASSIC_VARS: &str = ":root{--primary:#B8860B;--bg:#FAF7F2;--surface:#FFF;--text:#2C2C2C;--border:#E8E0D0;--muted:#6B6B6B;--timer-bg:rgba(184,134,11,0.1);--btn-text:#FFF;--badge-text:#FFF}";

const BOTANICAL_VARS: &str = ":root{--primary:#2D4A3E;--bg:#F5F0E8;--surface:#FAF7F2;--text:#2D4A3E;--border:#C9B8A6;--muted:#5A7A6E;--timer-bg:rgba(45,74,62,0.1);--btn-text:#F5F0E8;--badge-text:#F5F0E8}";

static LAYOUTS_2026: [Layout2026; 13] = [
    Layout2026 {
        name: "aurora",
        display_name: "Аурора",
        description: "Северни сјај са космичким честицама",
        themes: [
            ("northern", "Северна светла", "Класична зелена аурора са хладним тоновима"),
            ("cosmic", "Космос", "Ружичасто-љубичаста космичка аурора"),
        ],
        families: "family=Montserrat:wght@200;300;400&family=Inter:wght@300;400",
        emoji: "✨",
        css_vars: ":root{--primary:#9B4DCA;--bg:#0B0B1A;--surface:rgba(20,20,40,0.9);--text:#E0E0E0;--border:rgba(155,77,202,0.3);--muted:#8888AA;--timer-bg:rgba(155,77,202,0.2);--btn-text:#fff;--badge-text:#0B0B1A}",
    },
    Layout2026 {
        name: "botanical",
        display_name: "Ботаника",
        description: "Научни хербаријум са пресованим цвећем",
        themes: [
            ("forest", "Шума", "Дубоке шумске зелене боје са старинским папиром"),
            ("pressed", "Хербаријум", "Топли сепија тонови попут сушеног цвећа"),
        ],
        families: "family=Playfair+Display+SC&family=Playfair+Display:ital,wght@0,400;0,500;1,400&family=EB+Garamond:ital,wght@0,400;1,400&family=Courier+Prime&family=Caveat:wght@400",
        emoji: "🌿",
        css_vars: BOTANICAL_VARS,
    },
    Layout2026 {
        name: "cinema",
        display_name: "Биоскоп",
        description: "Позивница као премијера на великом платну",
        themes: [
            ("noir", "Филм ноар", "Драматичан црно-бели стил класичног филм ноара"),
            ("golden", "Златно доба", "Раскошан златни холивудски гламур"),
        ],
        families: "family=Cinzel:wght@400;500;600&family=Cormorant+Garamond:ital,wght@0,400;0,500;1,400",
        emoji: "🎬",
        css_vars: ":root{--primary:#D4AF37;--bg:#0A0A0A;--surface:#1A1A1A;--text:#FFF;--border:#333;--muted:#888;--timer-bg:rgba(212,175,55,0.1);--btn-text:#0A0A0A;--badge-text:#0A0A0A}",
    },
    Layout2026 {
        name: "concert",
        display_name: "Концерт",
        description: "Фестивалски постер за велику журку",
        themes: [
            ("rock", "Рок концерт", "Неон боје и драматичан контраст за велику забаву"),
            ("indie", "Инди фестивал", "Пригушене винтаж боје за интимнији догађај"),
        ],
        families: "family=Bebas+Neue&family=Inter:wght@400;500;600",
        emoji: "🎸",
        css_vars: ":root{--primary:#FF006E;--bg:#0D0D0D;--surface:#1A1A1A;--text:#FFF;--border:#333;--muted:#888;--timer-bg:rgba(255,0,110,0.1);--btn-text:#FFF;--badge-text:#0D0D0D}",
    },
    Layout2026 {
        name: "envelope",
        display_name: "Коверта",
        description: "Позивница која се отвара из коверте",
        themes: [
            ("velvet", "Плиш", "Луксузни дизајн са дубоким бордо тоновима и златним акцентима"),
            ("frost", "Модерни", "Модерни минималистички дизајн са хладним плавим тоновима"),
        ],
        families: "family=Cormorant+Garamond:ital,wght@0,300;0,400;0,500;1,400&family=Crimson+Text:ital,wght@0,400;0,600;1,400&family=Inter:wght@300;400;500;600;700",
        emoji: "💌",
        css_vars: ":root{--primary:#8B2942;--bg:#FFFBF5;--surface:#FFF;--text:#1F2937;--border:#E5E7EB;--muted:#6B7280;--timer-bg:rgba(139,41,66,0.1);--btn-text:#FFF;--badge-text:#FFF}",
    },
    Layout2026 {
        name: "filmnoir",
        display_name: "Филм Ноар",
        description: "Холивудска драма у црно-белом",
        themes: [
            ("classic", "Класик", "Црно-бело са драматичним црвеним акцентима"),
            ("golden", "Златно доба", "Топли сепија тонови холивудског гламура"),
        ],
        families: "family=Bebas+Neue&family=Playfair+Display:ital,wght@0,400;0,500;1,400&family=Libre+Franklin:wght@300;400",
        emoji: "🎬",
        css_vars: ":root{--primary:#D4AF37;--bg:#000;--surface:#111;--text:#FFF;--border:rgba(212,175,55,0.3);--muted:#999;--timer-bg:#D4AF37;--btn-text:#000;--badge-text:#000}",
    },
    Layout2026 {
        name: "glass",
        display_name: "Стаклена Галерија",
        description: "Модерни гласморфизам са светлосним ефектима",
        themes: [
            ("frost", "Мраз", "Хладни ледени тонови са замрзнутим ефектима"),
            ("aurora", "Аурора", "Топли градијенти са северним сјајем"),
        ],
        families: "family=Inter:wght@200;300;400;500",
        emoji: "💎",
        css_vars: ":root{--primary:#6366F1;--bg:#0F172A;--surface:rgba(30,41,59,0.8);--text:#E2E8F0;--border:rgba(99,102,241,0.3);--muted:#94A3B8;--timer-bg:rgba(99,102,241,0.2);--btn-text:#fff;--badge-text:#0F172A}",
    },
    Layout2026 {
        name: "kinetic",
        display_name: "Кинетичка Поезија",
        description: "Динамична типографија са анимацијама",
        themes: [
            ("editorial", "Едиторијал", "Чисте линије и модерна типографија"),
            ("moody", "Мрачни", "Тамни тонови са драматичним акцентима"),
        ],
        families: "family=Space+Grotesk:wght@300;400;500;600;700&family=Playfair+Display:ital,wght@0,400;1,400",
        emoji: "⚡",
        css_vars: ":root{--primary:#F59E0B;--bg:#18181B;--surface:#27272A;--text:#FAFAFA;--border:rgba(245,158,11,0.3);--muted:#A1A1AA;--timer-bg:rgba(245,158,11,0.2);--btn-text:#18181B;--badge-text:#18181B}",
    },
    Layout2026 {
        name: "mediterranean",
        display_name: "Медитеран",
        description: "Сунчана обала са керамичким мотивима",
        themes: [
            ("amalfi", "Амалфи", "Кобалт плава са лимун жутим акцентима"),
            ("santorini", "Санторини", "Бела и плава са топлим залазним тоновима"),
        ],
        families: "family=Playfair+Display:ital,wght@0,400;0,500;1,400&family=Libre+Franklin:wght@300;400;500",
        emoji: "🍋",
        css_vars: ":root{--primary:#0047AB;--bg:#FFFEF7;--surface:#FFF;--text:#1C3D5C;--border:#D4D0C8;--muted:#5A7A94;--timer-bg:rgba(0,71,171,0.1);--btn-text:#FFFEF7;--badge-text:#FFFEF7}",
    },
    Layout2026 {
        name: "oldmoney",
        display_name: "Стари Новац",
        description: "Класична елеганција наслеђеног богатства",
        themes: [
            ("ivory", "Слоновача", "Светли кремасти тонови са златним акцентима"),
            ("estate", "Имање", "Тамнији земљани тонови са бронзаним детаљима"),
        ],
        families: "family=Cormorant+Garamond:ital,wght@0,400;0,500;0,600;1,400&family=Montserrat:wght@300;400;500",
        emoji: "🏛️",
        css_vars: ":root{--primary:#8B7355;--bg:#FAF8F5;--surface:#FFFDF9;--text:#3D3428;--border:#D4C5B0;--muted:#7A6F5D;--timer-bg:rgba(139,115,85,0.1);--btn-text:#FAF8F5;--badge-text:#FAF8F5}",
    },
    Layout2026 {
        name: "scribble",
        display_name: "Шкрабање",
        description: "Ручно цртани стил са разиграним илустрацијама",
        themes: [
            ("watercolor", "Акварел", "Меке акварел боје са нежним прелазима"),
            ("pencil", "Оловка", "Графитни тонови са скицираним линијама"),
        ],
        families: "family=Caveat:wght@400;500;600;700&family=Patrick+Hand&family=Inter:wght@400;500",
        emoji: "✏️",
        css_vars: ":root{--primary:#E91E63;--bg:#FFFBF0;--surface:#FFF;--text:#333;--border:#DDD;--muted:#666;--timer-bg:rgba(233,30,99,0.1);--btn-text:#fff;--badge-text:#fff}",
    },
    Layout2026 {
        name: "velvet",
        display_name: "Поноћни Сомот",
        description: "Луксузна тамна елеганција",
        themes: [
            ("burgundy", "Бордо", "Дубока бордо са златним акцентима"),
            ("navy", "Тегет", "Елегантна тегет са сребрним детаљима"),
        ],
        families: "family=Cormorant+Garamond:ital,wght@0,300;0,400;0,500;1,400&family=Montserrat:wght@200;300;400",
        emoji: "🌙",
        css_vars: ":root{--primary:#C9A962;--bg:#1A1520;--surface:rgba(30,25,35,0.95);--text:#F5F0E8;--border:rgba(201,169,98,0.3);--muted:#9A8F99;--timer-bg:rgba(201,169,98,0.2);--btn-text:#1A1520;--badge-text:#1A1520}",
    },
    Layout2026 {
        name: "wabisabi",
        display_name: "Ваби-Саби",
        description: "Јапанска естетика несавршене лепоте",
        themes: [
            ("paper", "Васхи папир", "Светли природни папир са нежним текстурама"),
            ("ink", "Суми мастило", "Тамни мастило тонови са калиграфским акцентима"),
        ],
        families: "family=Noto+Serif+JP:wght@200;300;400&family=Zen+Kaku+Gothic+New:wght@300;400",
        emoji: "🍵",
        css_vars: ":root{--primary:#5C4033;--bg:#F5F2ED;--surface:#FDFBF7;--text:#3A3530;--border:#D4CEC5;--muted:#7A756D;--timer-bg:rgba(92,64,51,0.1);--btn-text:#F5F2ED;--badge-text:#F5F2ED}",
    },
];
