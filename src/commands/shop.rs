//! Handlers for the `daybook shop` subcommands.

use crate::commands::{store_for, Out};
use crate::config::Config;
use crate::controller::Collection;
use crate::model::{EntityId, ListItem};
use crate::store::Mode;
use crate::{Error, Result};
use rust_decimal::Decimal;

async fn collection(config: &Config, mode: Mode) -> Result<Collection<ListItem>> {
    // The shopping list keeps insertion order, newest at the front.
    Collection::load(store_for(config, mode), None).await
}

pub async fn add(config: &Config, mode: Mode, text: String) -> Result<Out<ListItem>> {
    let col = collection(config, mode).await?;
    let item = col.create(ListItem::new(col.next_id(), text)?).await?;
    col.flush().await;
    Ok(Out::with_structure(format!("Added {}", item.id), item))
}

pub async fn list(config: &Config, mode: Mode) -> Result<Out<Vec<ListItem>>> {
    let col = collection(config, mode).await?;
    let items = col.snapshot().await;
    if items.is_empty() {
        return Ok(Out::with_structure("Shopping list is empty.".to_string(), items));
    }
    let lines: Vec<String> = items.iter().map(render).collect();
    Ok(Out::with_structure(lines.join("\n"), items))
}

pub async fn price(
    config: &Config,
    mode: Mode,
    id: &str,
    qty: u32,
    unit_price: Decimal,
) -> Result<Out<ListItem>> {
    let col = collection(config, mode).await?;
    let id = EntityId::from(id);
    let mut item = col
        .get(&id)
        .await
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    item.mark_priced(qty, unit_price)?;
    let item = col.update(item).await?;
    col.flush().await;
    let total = item.total_price().unwrap_or_default();
    Ok(Out::with_structure(
        format!("Bought {qty} x {} for {total}", item.text),
        item,
    ))
}

pub async fn reopen(config: &Config, mode: Mode, id: &str) -> Result<Out<ListItem>> {
    let col = collection(config, mode).await?;
    let id = EntityId::from(id);
    let mut item = col
        .get(&id)
        .await
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    item.mark_unpriced();
    let item = col.update(item).await?;
    col.flush().await;
    Ok(Out::with_structure(format!("Reopened {}", item.text), item))
}

pub async fn rm(config: &Config, mode: Mode, id: &str) -> Result<Out<ListItem>> {
    let col = collection(config, mode).await?;
    let removed = col.delete(&EntityId::from(id)).await?;
    col.flush().await;
    Ok(Out::with_structure(
        format!("Deleted {}", removed.text),
        removed,
    ))
}

pub async fn clear(config: &Config, mode: Mode) -> Result<Out<()>> {
    let col = collection(config, mode).await?;
    let count = col.len().await;
    col.clear().await?;
    Ok(Out::new_message(format!("Cleared {count} items")))
}

fn render(item: &ListItem) -> String {
    let check = if item.completed() { 'x' } else { ' ' };
    let mut line = format!("[{check}] {}  {}", item.id, item.text);
    if let (Some(qty), Some(unit), Some(total)) =
        (item.quantity(), item.unit_price(), item.total_price())
    {
        line.push_str(&format!("  ({qty} x {unit} = {total})"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use std::str::FromStr;

    #[tokio::test]
    async fn price_and_reopen_round_trip() {
        let env = TestEnv::new().await;
        let config = env.config();

        let added = add(config, Mode::Disk, "oat milk".to_string()).await.unwrap();
        let id = added.structure().unwrap().id.clone();

        let priced = price(
            config,
            Mode::Disk,
            id.as_str(),
            3,
            Decimal::from_str("2.50").unwrap(),
        )
        .await
        .unwrap();
        let item = priced.structure().unwrap();
        assert!(item.completed());
        assert_eq!(item.total_price(), Some(Decimal::from_str("7.50").unwrap()));

        // Reload from disk and reopen.
        let reopened = reopen(config, Mode::Disk, id.as_str()).await.unwrap();
        let item = reopened.structure().unwrap();
        assert!(!item.completed());
        assert_eq!(item.quantity(), None);
        assert_eq!(item.unit_price(), None);
        assert_eq!(item.total_price(), None);
    }

    #[tokio::test]
    async fn clear_empties_the_list() {
        let env = TestEnv::new().await;
        let config = env.config();
        add(config, Mode::Disk, "eggs".to_string()).await.unwrap();
        add(config, Mode::Disk, "bread".to_string()).await.unwrap();
        let out = clear(config, Mode::Disk).await.unwrap();
        assert!(out.message().contains("2"));
        assert!(list(config, Mode::Disk)
            .await
            .unwrap()
            .structure()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn pricing_unknown_item_is_not_found() {
        let env = TestEnv::new().await;
        let result = price(
            env.config(),
            Mode::Disk,
            "0000000000000404",
            1,
            Decimal::ONE,
        )
        .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
