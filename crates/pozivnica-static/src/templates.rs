//! Template engine for the theme selector page.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::registry::LayoutConfig;

/// One theme card on the selector page.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeCard {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Context for rendering the selector page.
#[derive(Debug, Clone, Serialize)]
pub struct SelectorPage {
    pub slug: String,
    pub bride_name: String,
    pub groom_name: String,
    /// Layout name, as sent back with the selection
    pub layout: String,
    pub layout_name: String,
    pub layout_description: String,
    pub emoji: String,
    /// `:root` custom properties, trusted CSS
    pub css_vars: String,
    /// RFC 3339 expiry instant driving the countdown
    pub expires_at: String,
    /// Where the chosen theme is posted, empty to only confirm locally
    pub endpoint: String,
    pub themes: Vec<ThemeCard>,
}

impl SelectorPage {
    /// Cards for every theme of `layout`, in registry order.
    pub fn cards(layout: &LayoutConfig) -> Vec<ThemeCard> {
        layout
            .themes
            .iter()
            .map(|t| ThemeCard {
                id: t.id.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect()
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("selector.html".to_string(), SELECTOR_TEMPLATE.to_string())
            .expect("Failed to add selector template");

        Self { env }
    }

    /// Render the theme selector. Values are autoescaped.
    pub fn render_selector(&self, page: &SelectorPage) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("selector.html")?;

        tmpl.render(context! {
            slug => &page.slug,
            bride_name => &page.bride_name,
            groom_name => &page.groom_name,
            layout => &page.layout,
            layout_name => &page.layout_name,
            layout_description => &page.layout_description,
            emoji => &page.emoji,
            css_vars => &page.css_vars,
            expires_at => &page.expires_at,
            endpoint => &page.endpoint,
            themes => &page.themes,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const SELECTOR_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="sr">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="robots" content="noindex">
  <title>Изаберите тему - {{ bride_name }} & {{ groom_name }}</title>
  <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>{{ emoji }}</text></svg>">
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600&display=swap" rel="stylesheet">
  <style>
    *{box-sizing:border-box;margin:0;padding:0}
    {{ css_vars|safe }}
    body{font-family:'Inter',sans-serif;background:var(--bg);color:var(--text);line-height:1.6;min-height:100vh}
    .container{max-width:900px;margin:0 auto;padding:0 1rem}
    .header{background:var(--surface);border-bottom:2px solid var(--border);padding:1.5rem 0;position:sticky;top:0;z-index:100}
    .header-content{display:flex;justify-content:space-between;align-items:center;flex-wrap:wrap;gap:1rem}
    .header-title{font-size:1.25rem;font-weight:500}
    .header-title span{color:var(--primary)}
    .expiry-timer{display:flex;align-items:center;gap:0.5rem;padding:0.5rem 1rem;background:var(--timer-bg);border-radius:8px;font-size:0.875rem;color:var(--primary)}
    .main{padding:3rem 0}
    .intro{text-align:center;margin-bottom:3rem}
    .intro h1{font-size:2rem;font-weight:500;margin-bottom:0.75rem}
    .intro p{color:var(--muted);max-width:600px;margin:0 auto}
    .badge{display:inline-block;background:var(--primary);color:var(--badge-text);padding:0.25rem 0.75rem;border-radius:50px;font-size:0.75rem;margin-bottom:1rem}
    .theme-grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(350px,1fr));gap:2rem}
    .theme-card{background:var(--surface);border:1px solid var(--border);border-radius:12px;overflow:hidden;transition:transform 0.3s}
    .theme-card:hover{transform:translateY(-4px)}
    .theme-preview{aspect-ratio:3/4;overflow:hidden;background:var(--bg)}
    .theme-preview iframe{width:125%;height:125%;border:none;pointer-events:none;transform:scale(0.8);transform-origin:top left}
    .theme-info{padding:1.5rem}
    .theme-name{font-size:1.25rem;font-weight:500;margin-bottom:0.5rem}
    .theme-description{color:var(--muted);margin-bottom:1.25rem;font-size:0.9rem}
    .theme-actions{display:flex;gap:0.75rem}
    .btn{padding:0.75rem 1.25rem;border-radius:8px;font-size:0.9rem;font-weight:500;cursor:pointer;text-decoration:none;border:none;font-family:inherit}
    .btn-primary{background:var(--primary);color:var(--btn-text);flex:1}
    .btn-secondary{background:transparent;color:var(--text);border:1px solid var(--border)}
    .success-message{display:none;text-align:center;padding:4rem 2rem}
    .success-message.active{display:block}
    .modal-overlay{display:none;position:fixed;inset:0;background:rgba(0,0,0,0.5);z-index:1000;align-items:center;justify-content:center}
    .modal-overlay.active{display:flex}
    .modal{background:var(--surface);border:1px solid var(--border);border-radius:12px;max-width:400px;padding:2rem;text-align:center}
    .modal h2{margin-bottom:0.75rem}
    .modal p{color:var(--muted);margin-bottom:1.5rem}
    .modal-actions{display:flex;gap:1rem}
    .modal-actions .btn{flex:1}
  </style>
</head>
<body data-slug="{{ slug }}" data-layout="{{ layout }}" data-endpoint="{{ endpoint }}">
  <header class="header"><div class="container"><div class="header-content">
    <h1 class="header-title">{{ emoji }} <span>{{ bride_name }} & {{ groom_name }}</span></h1>
    <div class="expiry-timer" id="expiry-timer" data-expiry="{{ expires_at }}"><span>⏱️</span><span id="expiry-text">--:--:--</span></div>
  </div></div></header>
  <main class="main"><div class="container">
    <div class="intro">
      <span class="badge">{{ emoji }} {{ layout_name }}</span>
      <h1>Изаберите тему позивнице</h1>
      <p>{{ layout_description }}</p>
    </div>
    <div class="theme-grid">
    {%- for theme in themes %}
      <div class="theme-card">
        <div class="theme-preview"><iframe src="{{ theme.id }}.html" loading="lazy" title="{{ theme.name }}"></iframe></div>
        <div class="theme-info">
          <h3 class="theme-name">{{ theme.name }}</h3>
          <p class="theme-description">{{ theme.description }}</p>
          <div class="theme-actions">
            <a href="{{ theme.id }}.html" target="_blank" class="btn btn-secondary">Преглед</a>
            <button class="btn btn-primary" data-select-theme="{{ theme.id }}">Изабери</button>
          </div>
        </div>
      </div>
    {%- endfor %}
    </div>
  </div></main>
  <div class="success-message" id="success-message"><div class="container"><h2>✅ Тема изабрана!</h2></div></div>
  <div class="modal-overlay" id="modal-overlay"><div class="modal"><h2>Потврдите избор</h2><p>Да ли желите ову тему?</p><div class="modal-actions"><button class="btn btn-secondary" id="modal-cancel">Откажи</button><button class="btn btn-primary" id="modal-confirm">Потврди</button></div></div></div>
  <script>
    (function(){
      var timerEl=document.getElementById('expiry-timer'),textEl=document.getElementById('expiry-text'),expiry=new Date(timerEl.dataset.expiry);
      function pad(n){return String(n).padStart(2,'0')}
      function updateTimer(){var d=expiry-new Date();if(d<=0){textEl.textContent='Истекло';return}var days=Math.floor(d/86400000),h=Math.floor((d%86400000)/3600000),m=Math.floor((d%3600000)/60000),s=Math.floor((d%60000)/1000);textEl.textContent=(days>0?days+'д ':'')+[h,m,s].map(pad).join(':')}
      updateTimer();setInterval(updateTimer,1000);
      var body=document.body,selected='';
      document.querySelectorAll('[data-select-theme]').forEach(function(b){b.addEventListener('click',function(){selected=this.dataset.selectTheme;document.getElementById('modal-overlay').classList.add('active')})});
      document.getElementById('modal-cancel').addEventListener('click',function(){document.getElementById('modal-overlay').classList.remove('active')});
      document.getElementById('modal-confirm').addEventListener('click',function(){
        document.getElementById('modal-overlay').classList.remove('active');
        if(body.dataset.endpoint){fetch(body.dataset.endpoint,{method:'POST',mode:'no-cors',headers:{'Content-Type':'text/plain'},body:JSON.stringify({slug:body.dataset.slug,layout:body.dataset.layout,theme:selected})})}
        document.querySelector('.main').style.display='none';document.getElementById('success-message').classList.add('active')
      });
    })();
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LayoutRegistry;

    fn page() -> SelectorPage {
        let registry = LayoutRegistry::builtin();
        let layout = registry.get("aurora").unwrap();
        SelectorPage {
            slug: "ana-marko".to_string(),
            bride_name: "Ана".to_string(),
            groom_name: "<Марко>".to_string(),
            layout: layout.name.clone(),
            layout_name: layout.display_name.clone(),
            layout_description: layout.description.clone(),
            emoji: layout.emoji.clone(),
            css_vars: layout.css_vars.clone(),
            expires_at: "2025-05-31T08:00:00+00:00".to_string(),
            endpoint: String::new(),
            themes: SelectorPage::cards(layout),
        }
    }

    #[test]
    fn renders_a_card_per_theme() {
        let html = TemplateEngine::new().render_selector(&page()).unwrap();

        assert_eq!(html.matches("class=\"theme-card\"").count(), 2);
        assert!(html.contains("src=\"northern.html\""));
        assert!(html.contains("data-select-theme=\"cosmic\""));
        assert!(html.contains("data-expiry=\"2025-05-31T08:00:00+00:00\""));
    }

    #[test]
    fn escapes_names_but_not_css_vars() {
        let page = page();
        let html = TemplateEngine::new().render_selector(&page).unwrap();

        assert!(html.contains("&lt;Марко&gt;"));
        assert!(!html.contains("<Марко>"));
        assert!(html.contains(&page.css_vars));
    }
}
