//! HTML form capture for the portal's WebForms pages
//!
//! A form is read into an owned [`HtmlForm`] so the parsed document never
//! lives across an `.await`.

use crate::domain::SourceError;
use scraper::{ElementRef, Html, Selector};

/// A form's action, method and the fields a browser would submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlForm {
    pub action: Option<String>,
    pub method: FormMethod,
    fields: Vec<(String, String)>,
    default_submit: Option<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

impl HtmlForm {
    /// Set a field, replacing every existing value for that name
    pub fn set(&mut self, name: &str, value: &str) {
        match self.fields.iter().position(|(n, _)| n == name) {
            Some(index) => {
                self.fields[index].1 = value.to_string();
                let mut i = index + 1;
                while i < self.fields.len() {
                    if self.fields[i].0 == name {
                        self.fields.remove(i);
                    } else {
                        i += 1;
                    }
                }
            }
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Fields as submitted by pressing Enter: every control plus the first
    /// submit button
    pub fn submission(&self) -> Vec<(String, String)> {
        let mut fields = self.fields.clone();
        if let Some(submit) = &self.default_submit {
            fields.push(submit.clone());
        }
        fields
    }

    /// Fields as submitted by a script postback: no submit button
    pub fn postback(&self) -> Vec<(String, String)> {
        self.fields.clone()
    }

    fn from_element(form: ElementRef<'_>, controls: &Selector) -> Self {
        let element = form.value();
        let method = match element.attr("method") {
            Some(m) if m.eq_ignore_ascii_case("get") => FormMethod::Get,
            _ => FormMethod::Post,
        };

        let mut fields = Vec::new();
        let mut default_submit = None;

        for control in form.select(controls) {
            let el = control.value();
            let Some(name) = el.attr("name").filter(|n| !n.is_empty()) else {
                continue;
            };
            if el.attr("disabled").is_some() {
                continue;
            }

            match el.name() {
                "textarea" => {
                    fields.push((name.to_string(), control.text().collect::<String>()));
                }
                "select" => {
                    if let Some(value) = selected_option(control) {
                        fields.push((name.to_string(), value));
                    }
                }
                _ => {
                    let kind = el.attr("type").unwrap_or("text").to_ascii_lowercase();
                    let value = el.attr("value").unwrap_or_default().to_string();
                    match kind.as_str() {
                        "submit" | "image" => {
                            if default_submit.is_none() {
                                default_submit = Some((name.to_string(), value));
                            }
                        }
                        "button" | "reset" | "file" => {}
                        "checkbox" | "radio" => {
                            if el.attr("checked").is_some() {
                                let value = if value.is_empty() {
                                    "on".to_string()
                                } else {
                                    value
                                };
                                fields.push((name.to_string(), value));
                            }
                        }
                        _ => fields.push((name.to_string(), value)),
                    }
                }
            }
        }

        Self {
            action: element.attr("action").map(str::to_string),
            method,
            fields,
            default_submit,
        }
    }
}

fn selected_option(select: ElementRef<'_>) -> Option<String> {
    let options = Selector::parse("option").ok()?;
    let mut first = None;
    for option in select.select(&options) {
        let value = option
            .value()
            .attr("value")
            .map(str::to_string)
            .unwrap_or_else(|| option.text().collect::<String>().trim().to_string());
        if option.value().attr("selected").is_some() {
            return Some(value);
        }
        first.get_or_insert(value);
    }
    first
}

pub(crate) fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css)
        .map_err(|e| SourceError::InvalidResponse(format!("Invalid selector '{css}': {e:?}")))
}

fn controls_selector() -> Result<Selector, SourceError> {
    selector("input, select, textarea")
}

/// The login form: the one whose action is `login_action`, else the first
/// form on the page
pub fn find_login_form(html: &str, login_action: &str) -> Result<HtmlForm, SourceError> {
    let document = Html::parse_document(html);
    let forms = selector("form")?;
    let controls = controls_selector()?;

    document
        .select(&forms)
        .find(|form| form.value().attr("action") == Some(login_action))
        .or_else(|| document.select(&forms).next())
        .map(|form| HtmlForm::from_element(form, &controls))
        .ok_or_else(|| SourceError::FormNotFound("login form".to_string()))
}

/// The first form matching a CSS selector
pub fn find_form(html: &str, css: &str) -> Result<HtmlForm, SourceError> {
    let document = Html::parse_document(html);
    let forms = selector(css)?;
    let controls = controls_selector()?;

    document
        .select(&forms)
        .next()
        .map(|form| HtmlForm::from_element(form, &controls))
        .ok_or_else(|| SourceError::FormNotFound(css.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = r#"
<html><body>
  <form id="lang" action="./Language.aspx" method="get">
    <input type="text" name="lang" value="en" />
  </form>
  <form id="login" action="./Login.aspx" method="post">
    <input type="hidden" name="__VIEWSTATE" value="abc123" />
    <input type="hidden" name="__EVENTVALIDATION" value="xyz" />
    <input type="text" name="user" />
    <input type="password" name="pass" />
    <input type="checkbox" name="remember" />
    <input type="checkbox" name="terms" value="yes" checked />
    <select name="region"><option value="uk">UK</option><option value="ie" selected>IE</option></select>
    <input type="submit" name="login" value="Log in" />
    <input type="submit" name="cancel" value="Cancel" />
    <input type="text" name="locked" value="x" disabled />
  </form>
</body></html>"#;

    #[test]
    fn test_prefers_form_with_login_action() {
        let form = find_login_form(LOGIN_PAGE, "./Login.aspx").unwrap();
        assert_eq!(form.action.as_deref(), Some("./Login.aspx"));
        assert_eq!(form.method, FormMethod::Post);
        assert_eq!(form.get("__VIEWSTATE"), Some("abc123"));
        assert_eq!(form.get("terms"), Some("yes"));
        assert_eq!(form.get("region"), Some("ie"));
        assert_eq!(form.get("remember"), None);
        assert_eq!(form.get("locked"), None);
    }

    #[test]
    fn test_falls_back_to_first_form() {
        let form = find_login_form(LOGIN_PAGE, "./SignIn.aspx").unwrap();
        assert_eq!(form.action.as_deref(), Some("./Language.aspx"));
        assert_eq!(form.method, FormMethod::Get);
    }

    #[test]
    fn test_no_forms() {
        let err = find_login_form("<html><body>maintenance</body></html>", "./Login.aspx");
        assert!(matches!(err, Err(SourceError::FormNotFound(_))));
    }

    #[test]
    fn test_submission_includes_first_submit_only() {
        let mut form = find_login_form(LOGIN_PAGE, "./Login.aspx").unwrap();
        form.set("user", "alice");

        let submitted = form.submission();
        assert!(submitted.contains(&("user".to_string(), "alice".to_string())));
        assert!(submitted.contains(&("login".to_string(), "Log in".to_string())));
        assert!(!submitted.iter().any(|(n, _)| n == "cancel"));
        assert!(!form.postback().iter().any(|(n, _)| n == "login"));
    }

    #[test]
    fn test_set_adds_missing_and_replaces_existing() {
        let mut form = find_form(LOGIN_PAGE, "form#login").unwrap();
        form.set("__EVENTTARGET", "target");
        form.set("__VIEWSTATE", "new");
        assert_eq!(form.get("__EVENTTARGET"), Some("target"));
        assert_eq!(form.get("__VIEWSTATE"), Some("new"));
        assert_eq!(
            form.postback()
                .iter()
                .filter(|(n, _)| n == "__VIEWSTATE")
                .count(),
            1
        );
    }

    #[test]
    fn test_find_form_by_selector() {
        assert!(find_form(LOGIN_PAGE, "form#missing").is_err());
        assert!(matches!(
            find_form(LOGIN_PAGE, "form[[["),
            Err(SourceError::InvalidResponse(_))
        ));
    }
}
