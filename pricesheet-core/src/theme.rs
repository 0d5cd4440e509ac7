//! Injected layout/style configuration. Every dimension, color and
//! static string the renderer uses lives here so output is fully
//! determined by inputs, with no ambient lookups.

/// Font sizes per semantic role, in px. The sheet is rendered with a
/// single `sans-serif` family (whatever the caller mapped into the
/// font database), sized per role.
#[derive(Clone, Copy, Debug)]
pub struct FontSizes {
    pub header: f64,
    pub date: f64,
    pub title: f64,
    pub spec: f64,
    pub price: f64,
    pub note: f64,
    pub footer: f64,
}

#[derive(Clone, Debug)]
pub struct Theme {
    /// Fixed sheet width in px.
    pub width: u32,
    /// Outer margin on every side.
    pub margin: f64,
    /// Horizontal gap between the two columns.
    pub column_gap: f64,
    /// Height of the solid header band.
    pub header_band: f64,
    /// Y offset where column content starts; both column cursors are
    /// initialized to this.
    pub header_offset: f64,
    /// Height reserved for a group's title line.
    pub title_height: f64,
    /// Height of one spec/price row.
    pub row_height: f64,
    /// Height of the shaded note sub-band.
    pub note_height: f64,
    /// Vertical spacing between groups.
    pub group_gap: f64,
    /// Allowance below the taller column for the footer.
    pub footer_allowance: f64,

    pub fonts: FontSizes,

    pub background: String,
    pub header_fill: String,
    pub header_text: String,
    pub date_text: String,
    pub title_color: String,
    pub spec_color: String,
    pub price_color: String,
    pub note_fill: String,
    pub note_color: String,
    pub guide_color: String,
    pub footer_color: String,

    pub sheet_title: String,
    pub advisory: String,
    pub attribution: String,
}

impl Theme {
    /// Usable width of one column.
    pub fn column_width(&self) -> f64 {
        (self.width as f64 - self.margin * 2.0 - self.column_gap) / 2.0
    }

    /// Left X of the given column's content area.
    pub fn column_x(&self, right: bool) -> f64 {
        if right {
            self.margin + self.column_width() + self.column_gap
        } else {
            self.margin
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            width: 1080,
            margin: 50.0,
            column_gap: 40.0,
            header_band: 220.0,
            header_offset: 260.0,
            title_height: 56.0,
            row_height: 44.0,
            note_height: 40.0,
            group_gap: 28.0,
            footer_allowance: 90.0,
            fonts: FontSizes {
                header: 64.0,
                date: 34.0,
                title: 34.0,
                spec: 24.0,
                price: 28.0,
                note: 20.0,
                footer: 22.0,
            },
            background: "#FAFAFA".to_string(),
            header_fill: "#003366".to_string(),
            header_text: "#FFFFFF".to_string(),
            date_text: "#DDDDDD".to_string(),
            title_color: "#003366".to_string(),
            spec_color: "#333333".to_string(),
            price_color: "#D32F2F".to_string(),
            note_fill: "#EEF1F4".to_string(),
            note_color: "#888888".to_string(),
            guide_color: "#DDDDDD".to_string(),
            footer_color: "#999999".to_string(),
            sheet_title: "本週最新時價".to_string(),
            advisory: "價格隨漁獲波動，以當日確認為準".to_string(),
            attribution: "本報價單由系統自動產生".to_string(),
        }
    }
}
