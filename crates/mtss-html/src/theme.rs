//! Fixed color theme applied to rendered and exported HTML

use mtss_core::config::BrandingSettings;
use mtss_core::Rgb;

use crate::error::Result;

/// Colors for headings and tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// h1 text and border, h2 text, table header background
    pub primary: Rgb,
    /// h3 and deeper
    pub secondary: Rgb,
    /// Background of every other table row
    pub stripe: Rgb,
    /// Cell borders
    pub border: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Rgb(0x3d, 0xa0, 0xad),
            secondary: Rgb(0x2a, 0x89, 0x95),
            stripe: Rgb(0xf2, 0xf2, 0xf2),
            border: Rgb(0xdd, 0xdd, 0xdd),
        }
    }
}

impl Theme {
    /// Theme using the configured brand colors
    pub fn from_branding(branding: &BrandingSettings) -> Result<Self> {
        Ok(Self {
            primary: branding.primary()?,
            secondary: branding.secondary()?,
            ..Self::default()
        })
    }

    /// Inline style for a heading of the given level
    pub fn heading_style(&self, level: u8) -> String {
        match level {
            1 => format!(
                "color: {}; border-bottom: 2px solid {}; padding-bottom: 10px;",
                self.primary, self.primary
            ),
            2 => format!("color: {};", self.primary),
            _ => format!("color: {};", self.secondary),
        }
    }

    pub fn table_style(&self) -> &'static str {
        "border-collapse: collapse; width: 100%; margin: 20px 0;"
    }

    pub fn th_style(&self) -> String {
        format!(
            "background-color: {}; color: white; padding: 8px; text-align: left; border: 1px solid {};",
            self.primary, self.border
        )
    }

    pub fn td_style(&self) -> String {
        format!("border: 1px solid {}; padding: 8px;", self.border)
    }

    /// Style for table row `index`, counting the header as row 0
    ///
    /// Odd rows (the second, fourth, ...) get the stripe background.
    pub fn row_style(&self, index: usize) -> Option<String> {
        (index % 2 == 1).then(|| format!("background-color: {};", self.stripe))
    }

    /// Embedded stylesheet for standalone documents
    pub fn stylesheet(&self) -> String {
        format!(
            r#"  body {{
    font-family: Arial, sans-serif;
    line-height: 1.6;
    max-width: 800px;
    margin: 40px auto;
  }}
  h1 {{
    color: {primary};
    border-bottom: 2px solid {primary};
    padding-bottom: 10px;
  }}
  h2 {{
    color: {primary};
    margin-top: 25px;
  }}
  h3, h4, h5, h6 {{
    color: {secondary};
  }}
  table {{
    border-collapse: collapse;
    width: 100%;
    margin: 20px 0;
  }}
  th {{
    background-color: {primary};
    color: white;
    padding: 8px;
    text-align: left;
  }}
  td {{
    border: 1px solid {border};
    padding: 8px;
  }}
  tr:nth-child(even) {{
    background-color: {stripe};
  }}
  ul, ol {{
    margin-bottom: 1rem;
    padding-left: 1.5rem;
  }}
  li {{
    margin-bottom: 0.5rem;
  }}
  .footer {{
    margin-top: 40px;
    padding-top: 20px;
    border-top: 1px solid #eee;
    text-align: center;
    color: #666;
    font-size: 0.8rem;
  }}
"#,
            primary = self.primary,
            secondary = self.secondary,
            border = self.border,
            stripe = self.stripe,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_by_level() {
        let theme = Theme::default();
        assert!(theme.heading_style(1).contains("border-bottom: 2px solid #3da0ad"));
        assert_eq!(theme.heading_style(2), "color: #3da0ad;");
        assert_eq!(theme.heading_style(3), "color: #2a8995;");
        assert_eq!(theme.heading_style(6), "color: #2a8995;");
    }

    #[test]
    fn test_stripes_start_at_second_row() {
        let theme = Theme::default();
        assert!(theme.row_style(0).is_none());
        assert_eq!(
            theme.row_style(1).as_deref(),
            Some("background-color: #f2f2f2;")
        );
        assert!(theme.row_style(2).is_none());
    }

    #[test]
    fn test_from_branding() {
        let branding = BrandingSettings {
            primary_color: "#112233".to_string(),
            ..Default::default()
        };
        let theme = Theme::from_branding(&branding).unwrap();
        assert_eq!(theme.primary, Rgb(0x11, 0x22, 0x33));
        assert!(theme.stylesheet().contains("color: #112233;"));

        let bad = BrandingSettings {
            secondary_color: "nope".to_string(),
            ..Default::default()
        };
        assert!(Theme::from_branding(&bad).is_err());
    }
}
