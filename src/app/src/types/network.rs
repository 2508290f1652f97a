use serde::{Deserialize, Serialize};

/// One visible wireless network from a scan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScannedNetwork {
    pub name: String,
    pub rssi: i32,
    pub channel: u32,
}

/// Body of `GET /wifiscan`, ranked as the device reports it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiScan {
    pub networks: Vec<ScannedNetwork>,
}

/// An entry of a network combo's option list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NetworkOption {
    /// A live scan result
    Scanned { name: String, rssi: i32, channel: u32 },
    /// Free-typed text not present among the scan results
    Typed { text: String },
}

impl NetworkOption {
    /// Value submitted when this option is chosen
    pub fn value(&self) -> &str {
        match self {
            Self::Scanned { name, .. } => name,
            Self::Typed { text } => text,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Scanned {
                name,
                rssi,
                channel,
            } => format!("{name} ({rssi} dBm, ch {channel})"),
            Self::Typed { text } => text.clone(),
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, Self::Typed { .. })
    }
}

impl From<&ScannedNetwork> for NetworkOption {
    fn from(network: &ScannedNetwork) -> Self {
        Self::Scanned {
            name: network.name.clone(),
            rssi: network.rssi,
            channel: network.channel,
        }
    }
}

/// Combo widget: a select of scan results plus a free-text side
///
/// `text` is the source of truth for what the user wants; the option list
/// is rebuilt around it and never overrides it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkCombo {
    pub options_id: String,
    pub text: String,
    pub options: Vec<NetworkOption>,
    pub selected: Option<usize>,
}

impl NetworkCombo {
    pub fn new(options_id: impl Into<String>) -> Self {
        Self {
            options_id: options_id.into(),
            ..Default::default()
        }
    }

    pub fn selected_option(&self) -> Option<&NetworkOption> {
        self.options.get(self.selected?)
    }

    /// Replace the option list with a fresh scan, keeping the current text
    pub fn merge_scan(&mut self, networks: &[ScannedNetwork]) {
        self.options.clear();

        let mut matched = None;
        for (index, network) in networks.iter().enumerate() {
            if matched.is_none() && network.name == self.text {
                matched = Some(index);
            }
            self.options.push(network.into());
        }

        match matched {
            Some(index) => self.selected = Some(index),
            None => {
                self.options.insert(
                    0,
                    NetworkOption::Typed {
                        text: self.text.clone(),
                    },
                );
                self.selected = Some(0);
            }
        }
    }

    /// React to the user editing the free-text side
    pub fn select_text(&mut self, text: impl Into<String>) {
        self.text = text.into();

        if let Some(index) = self.options.iter().position(|o| o.value() == self.text) {
            let front_is_typed = self.options.first().is_some_and(NetworkOption::is_typed);
            if front_is_typed && index != 0 {
                self.options.remove(0);
                self.selected = Some(index - 1);
            } else {
                self.selected = Some(index);
            }
            return;
        }

        match self.options.first_mut() {
            Some(NetworkOption::Typed { text }) => text.clone_from(&self.text),
            _ => self.options.insert(
                0,
                NetworkOption::Typed {
                    text: self.text.clone(),
                },
            ),
        }
        self.selected = Some(0);
    }

    /// React to the user picking an option from the select side
    ///
    /// Picking behaves like typing the option's value. Returns `false` if
    /// `index` is out of range.
    pub fn pick(&mut self, index: usize) -> bool {
        match self.options.get(index).map(|o| o.value().to_string()) {
            Some(value) => {
                self.select_text(value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan() -> Vec<ScannedNetwork> {
        vec![
            ScannedNetwork {
                name: "Home".to_string(),
                rssi: -40,
                channel: 6,
            },
            ScannedNetwork {
                name: "Office".to_string(),
                rssi: -70,
                channel: 11,
            },
        ]
    }

    fn combo_with_text(text: &str) -> NetworkCombo {
        NetworkCombo {
            options_id: "wifi_ssid-options".to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    mod merge_scan {
        use super::*;

        #[test]
        fn selects_matching_entry_without_synthetic_option() {
            let mut combo = combo_with_text("Home");

            combo.merge_scan(&scan());

            assert_eq!(combo.options.len(), 2);
            assert_eq!(combo.selected, Some(0));
            assert_eq!(combo.selected_option().map(|o| o.value()), Some("Home"));
            assert!(combo.options.iter().all(|o| !o.is_typed()));
        }

        #[test]
        fn inserts_synthetic_option_when_text_is_not_visible() {
            let mut combo = combo_with_text("MyPhone");

            combo.merge_scan(&scan());

            assert_eq!(combo.options.len(), 3);
            assert_eq!(
                combo.options[0],
                NetworkOption::Typed {
                    text: "MyPhone".to_string()
                }
            );
            assert_eq!(combo.options[0].label(), "MyPhone");
            assert_eq!(combo.selected, Some(0));
        }

        #[test]
        fn replaces_previous_options_wholesale() {
            let mut combo = combo_with_text("MyPhone");
            combo.merge_scan(&scan());

            combo.merge_scan(&scan()[1..]);

            assert_eq!(combo.options.len(), 2);
            assert_eq!(combo.options[1].value(), "Office");
        }

        #[test]
        fn keeps_text_when_scan_is_empty() {
            let mut combo = combo_with_text("Home");

            combo.merge_scan(&[]);

            assert_eq!(combo.text, "Home");
            assert_eq!(combo.options.len(), 1);
            assert!(combo.options[0].is_typed());
        }

        #[test]
        fn network_named_like_an_annotation_is_still_real() {
            let mut combo = combo_with_text("Cafe (-50 dBm, ch 1)");
            let networks = vec![ScannedNetwork {
                name: "Cafe (-50 dBm, ch 1)".to_string(),
                rssi: -50,
                channel: 1,
            }];

            combo.merge_scan(&networks);

            assert_eq!(combo.options.len(), 1);
            assert!(!combo.options[0].is_typed());
        }
    }

    mod select_text {
        use super::*;

        #[test]
        fn reacquiring_a_scanned_name_drops_synthetic_front() {
            let mut combo = combo_with_text("MyPhone");
            combo.merge_scan(&scan());

            combo.select_text("Office");

            assert_eq!(combo.options.len(), 2);
            assert!(combo.options.iter().all(|o| !o.is_typed()));
            assert_eq!(combo.selected_option().map(|o| o.value()), Some("Office"));
        }

        #[test]
        fn overwrites_synthetic_front_in_place() {
            let mut combo = combo_with_text("MyPhone");
            combo.merge_scan(&scan());

            combo.select_text("MyPhon");

            assert_eq!(combo.options.len(), 3);
            assert_eq!(combo.options[0].value(), "MyPhon");
            assert_eq!(combo.selected, Some(0));
        }

        #[test]
        fn inserts_synthetic_front_when_front_is_scanned() {
            let mut combo = combo_with_text("Home");
            combo.merge_scan(&scan());

            combo.select_text("Guest");

            assert_eq!(combo.options.len(), 3);
            assert_eq!(
                combo.options[0],
                NetworkOption::Typed {
                    text: "Guest".to_string()
                }
            );
            assert_eq!(combo.selected, Some(0));
        }

        #[test]
        fn works_before_any_scan() {
            let mut combo = NetworkCombo::new("wifi_ssid-options");

            combo.select_text("Home");

            assert_eq!(combo.options.len(), 1);
            assert_eq!(combo.selected, Some(0));
            assert_eq!(combo.text, "Home");
        }
    }

    #[test]
    fn pick_behaves_like_typing_the_value() {
        let mut combo = combo_with_text("MyPhone");
        combo.merge_scan(&scan());

        assert!(combo.pick(2));
        assert_eq!(combo.text, "Office");
        assert_eq!(combo.options.len(), 2);
        assert_eq!(combo.selected, Some(1));

        assert!(!combo.pick(7));
        assert_eq!(combo.text, "Office");
    }

    #[test]
    fn scanned_label_carries_signal_annotation() {
        let option = NetworkOption::from(&scan()[0]);
        assert_eq!(option.label(), "Home (-40 dBm, ch 6)");
    }
}
