use crate::config::IntroConfig;
use crate::constants::*;
use crate::particle::Particle;

// Elements serialized without a closing tag
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

/// A detached element tree, built once and handed to a [`Surface`](crate::surface::Surface).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub style: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search for the element carrying `id`, including `self`.
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        if let Some(style) = &self.style {
            push_attr(out, "style", style);
        }
        for (name, value) in &self.attrs {
            push_attr(out, name, value);
        }

        if VOID_TAGS.contains(&self.tag.as_str()) {
            out.push_str(" />");
            return;
        }
        out.push('>');

        if let Some(text) = &self.text {
            out.push_str(&htmlescape::encode_minimal(text));
        }
        for child in &self.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&htmlescape::encode_minimal(value));
    out.push('"');
}

/// Builds the full intro overlay tree.
///
/// The particle container is left empty; particles are appended later through
/// [`particle`].
pub fn overlay(config: &IntroConfig) -> Element {
    // Three bursts, staggered by half a second
    let burst = |delay: Option<&str>| {
        let mut style = String::from("top: 50%; left: 50%; transform: translate(-50%, -50%);");
        if let Some(delay) = delay {
            style.push_str(&format!(" animation-delay: {delay};"));
        }
        Element::new("div").class("energy-burst").style(style)
    };

    Element::new("div")
        .id(ROOT_ID)
        .class(ROOT_CLASS)
        .child(Element::new("div").class("stars"))
        .child(Element::new("div").id(PARTICLES_ID).class("particles"))
        .child(Element::new("div").class("energy-ring"))
        .child(burst(None))
        .child(burst(Some("0.5s")))
        .child(burst(Some("1s")))
        .child(
            Element::new("div").class("ultraman-logo").child(
                Element::new("img")
                    .class("ultraman-icon")
                    .attr("src", config.logo.src())
                    .attr("alt", config.logo_alt.as_str()),
            ),
        )
        .child(Element::new("h1").class("ultraman-title").text(config.title.as_str()))
        .child(Element::new("p").class("ultraman-subtitle").text(config.subtitle.as_str()))
        .child(Element::new("p").class("ultraman-text").text(config.tagline.as_str()))
        .child(
            Element::new("div")
                .class("loading-bar")
                .child(Element::new("div").class("loading-progress")),
        )
        .child(Element::new("p").class("ultraman-text").text(config.status.as_str()))
}

pub fn particle(particle: &Particle) -> Element {
    Element::new("div").class(PARTICLE_CLASS).style(particle.style())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_has_stylesheet_hooks() {
        let root = overlay(&IntroConfig::default());

        assert_eq!(root.id.as_deref(), Some(ROOT_ID));
        assert!(root.has_class(ROOT_CLASS));

        let particles = root.find(PARTICLES_ID).expect("particle container");
        assert!(particles.has_class("particles"));
        assert!(particles.children.is_empty());
    }

    #[test]
    fn overlay_children_in_order() {
        let root = overlay(&IntroConfig::default());
        let classes: Vec<&str> = root
            .children
            .iter()
            .map(|c| c.classes[0].as_str())
            .collect();

        assert_eq!(
            classes,
            [
                "stars",
                "particles",
                "energy-ring",
                "energy-burst",
                "energy-burst",
                "energy-burst",
                "ultraman-logo",
                "ultraman-title",
                "ultraman-subtitle",
                "ultraman-text",
                "loading-bar",
                "ultraman-text",
            ]
        );

        let delays: Vec<bool> = root.children[3..6]
            .iter()
            .map(|b| b.style.as_deref().unwrap_or_default().contains("animation-delay"))
            .collect();
        assert_eq!(delays, [false, true, true]);
    }

    #[test]
    fn html_escapes_text_and_attributes() {
        let html = overlay(&IntroConfig::default()).to_html();

        assert!(html.starts_with(r#"<div id="ultraman-intro" class="ultraman-intro">"#));
        assert!(html.contains("Based on R-Bibliometrix &amp; VOSviewer"));
        assert!(html.contains("Initializing System..."));
        assert!(!html.contains("</img>"));

        let el = Element::new("p").attr("title", "\"quoted\"").text("<b>");
        let html = el.to_html();
        assert!(!html.contains("<b>"));
        assert!(!html.contains("\"quoted\""));
    }

    #[test]
    fn logo_uses_configured_source() {
        let root = overlay(&IntroConfig::default());
        let img = &root.children[6].children[0];

        assert_eq!(img.tag, "img");
        assert!(img.attrs.contains(&("src".to_string(), "/static/images/intro-logo.png".to_string())));
        assert!(img.attrs.contains(&("alt".to_string(), "Ultraman".to_string())));
    }
}
