use crate::domain::recommendation::Recommendation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PicksPanel {
    pub title: String,
    pub cards: Vec<PickCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickCard {
    pub ticker: String,
    pub market: String,
    pub name: String,
    pub rationale: String,
}

/// Nothing to show for an empty list.
pub fn render_recommendations(items: &[Recommendation]) -> Option<PicksPanel> {
    if items.is_empty() {
        return None;
    }

    let cards = items
        .iter()
        .map(|item| PickCard {
            ticker: item.ticker.clone(),
            market: item.market.clone(),
            name: item.name.clone(),
            rationale: item.rationale.clone(),
        })
        .collect::<Vec<_>>();

    Some(PicksPanel {
        title: format!("Top {} Growth Picks (USA + Canada)", cards.len()),
        cards,
    })
}
