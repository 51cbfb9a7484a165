//! HTML page rendering.
//!
//! The pages are compiled into the binary; `.html` templates are rendered
//! with HTML auto-escaping.

use minijinja::Environment;
use serde::Serialize;

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_debug(cfg!(debug_assertions));
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("login.html", include_str!("../templates/login.html"))?;
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        env.add_template("chat.html", include_str!("../templates/chat.html"))?;
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(context)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use minijinja::context;

    #[test]
    fn all_pages_render() {
        let templates = Templates::new().unwrap();
        for name in ["login.html", "index.html", "chat.html"] {
            let html = templates.render(name, context! { user => "Ada" }).unwrap();
            assert!(html.contains("Run.AI Coach"), "{name} is missing the title");
        }
    }

    #[test]
    fn user_name_is_escaped() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render("index.html", context! { user => "<b>Ada</b>" })
            .unwrap();
        assert!(html.contains("&lt;b&gt;Ada&lt;/b&gt;"));
        assert!(!html.contains("<b>Ada</b>"));
    }
}
