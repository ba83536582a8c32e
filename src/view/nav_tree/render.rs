use super::node::NodeId;
use super::tree::NavigationTree;
use crate::config::NUM_PLACEHOLDER;

const INDENT: &str = "    ";

/// State of the plus/minus affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandIcon {
    Collapsed,
    Expanded,
}

/// Everything a host needs to draw one collection
#[derive(Debug, Clone, PartialEq)]
pub struct NodePresentation {
    pub id: NodeId,
    pub depth: usize,
    pub title: String,
    /// Link target of the title
    pub href: String,
    /// Link tooltip, the title template with the item count filled in
    pub tooltip: String,
    pub icon_url: Option<String>,
    /// None when expansion is disabled
    pub expand_icon: Option<ExpandIcon>,
    /// Background image of the expand affordance
    pub expand_icon_url: Option<String>,
    pub selected: bool,
}

/// One line of the rendered tree
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedRow {
    Node(NodePresentation),
    /// Placeholder shown under a node while its children load
    Loading {
        parent: NodeId,
        depth: usize,
        message: String,
    },
}

/// Turns a `NavigationTree` into presentation rows
pub struct TreeRenderer;

impl TreeRenderer {
    /// Presentation of a single node, visible or not
    pub fn present(tree: &NavigationTree, id: NodeId) -> Option<NodePresentation> {
        let node = tree.get_node(id)?;
        let config = tree.config();

        let expand_icon = if node.is_disabled() {
            None
        } else if node.is_expanded() {
            Some(ExpandIcon::Expanded)
        } else {
            Some(ExpandIcon::Collapsed)
        };

        let expand_icon_url = expand_icon.map(|icon| {
            let file = match icon {
                ExpandIcon::Collapsed => &config.icons.collapsed,
                ExpandIcon::Expanded => &config.icons.expanded,
            };
            format!("{}@@/{}", tree.base_url(), file)
        });

        Some(NodePresentation {
            id,
            depth: tree.get_depth(id),
            title: node.name.clone(),
            href: config.content_url(&node.path),
            tooltip: format_title(&config.title_template, node.length),
            icon_url: (!node.icon_url.is_empty()).then(|| node.icon_url.clone()),
            expand_icon,
            expand_icon_url,
            selected: node.selected,
        })
    }

    /// Rows for every visible node in tree order, with loading placeholders
    pub fn rows(tree: &NavigationTree) -> Vec<RenderedRow> {
        let mut rows = Vec::new();

        for id in tree.get_visible_nodes() {
            let Some(presentation) = Self::present(tree, id) else {
                continue;
            };
            let depth = presentation.depth;
            rows.push(RenderedRow::Node(presentation));

            if tree.get_node(id).is_some_and(|n| n.is_loading()) {
                rows.push(RenderedRow::Loading {
                    parent: id,
                    depth: depth + 1,
                    message: tree.config().loading_message.clone(),
                });
            }
        }

        rows
    }

    /// Plain-text rendering, one line per row
    ///
    /// ```text
    /// [-] [top]
    ///     [+] folder
    ///         Loading...
    ///     [ ] empty *
    /// ```
    pub fn render_text(tree: &NavigationTree) -> String {
        let mut out = String::new();

        for row in Self::rows(tree) {
            match row {
                RenderedRow::Node(node) => {
                    let glyph = match node.expand_icon {
                        Some(ExpandIcon::Collapsed) => "[+]",
                        Some(ExpandIcon::Expanded) => "[-]",
                        None => "[ ]",
                    };
                    out.push_str(&INDENT.repeat(node.depth));
                    out.push_str(glyph);
                    out.push(' ');
                    out.push_str(&node.title);
                    if node.selected {
                        out.push_str(" *");
                    }
                }
                RenderedRow::Loading { depth, message, .. } => {
                    out.push_str(&INDENT.repeat(depth));
                    out.push_str(&message);
                }
            }
            out.push('\n');
        }

        out
    }
}

/// Fill the item count into a title template
///
/// Both `${num}` and the escaped `$${num}` spelling are recognised.
pub fn format_title(template: &str, length: Option<u64>) -> String {
    let num = length.map_or_else(|| "?".to_string(), |n| n.to_string());
    template
        .replace("$${num}", &num)
        .replace(NUM_PLACEHOLDER, &num)
}
