//! Rating suppliers for the active user: a terminal prompt and a seeded
//! random generator.

use anyhow::{Context, Result, bail};
use data_loader::{ItemCatalog, ItemId, MAX_RATING, MIN_RATING, RatingValue};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use recommender::RatingSupplier;
use std::io::{BufRead, Write};

/// Pick `count` distinct catalog items for the active user to rate
pub fn sample_items(catalog: &ItemCatalog, count: usize, rng: &mut StdRng) -> Vec<ItemId> {
    let ids = catalog.item_ids();
    ids.choose_multiple(rng, count).copied().collect()
}

/// Asks for each rating on the terminal until a valid one is entered
pub struct PromptSupplier<'a, R, W> {
    catalog: &'a ItemCatalog,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> PromptSupplier<'a, R, W> {
    pub fn new(catalog: &'a ItemCatalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    fn ask(&mut self, item_id: ItemId) -> Result<RatingValue> {
        let title = self
            .catalog
            .get_item(item_id)
            .map(|item| item.title.as_str())
            .unwrap_or("unknown item");
        write!(
            self.output,
            "What do you think about \"{}\"? [{}-{}]: ",
            title, MIN_RATING, MAX_RATING
        )?;
        self.output.flush()?;

        loop {
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("Failed to read rating")?;
            if read == 0 {
                bail!("Input closed before item {} was rated", item_id);
            }
            match line.trim().parse::<RatingValue>() {
                Ok(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => return Ok(rating),
                _ => {
                    write!(
                        self.output,
                        "Oops! Something went wrong, ensure that your rating is between {} and {}: ",
                        MIN_RATING, MAX_RATING
                    )?;
                    self.output.flush()?;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> RatingSupplier for PromptSupplier<'_, R, W> {
    fn supply(&mut self, item_ids: &[ItemId]) -> Result<Vec<(ItemId, RatingValue)>> {
        item_ids
            .iter()
            .map(|&item_id| Ok((item_id, self.ask(item_id)?)))
            .collect()
    }
}

/// Rates every item uniformly at random
pub struct RandomSupplier {
    rng: StdRng,
}

impl RandomSupplier {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RatingSupplier for RandomSupplier {
    fn supply(&mut self, item_ids: &[ItemId]) -> Result<Vec<(ItemId, RatingValue)>> {
        Ok(item_ids
            .iter()
            .map(|&item_id| (item_id, self.rng.random_range(MIN_RATING..=MAX_RATING)))
            .collect())
    }
}
