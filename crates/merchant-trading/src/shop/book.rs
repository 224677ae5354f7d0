//! Book shops: sell copies of written books kept in the container.
//!
//! The container holds the originals (or first copies) and a supply of
//! blank writable books. Every copy sold consumes one writable book and
//! earns the offer's price net of tax.

use merchant_types::{AbortReason, BookGeneration, BookMeta, ItemStack, ShopType, TradingRecipe};

use super::{ShopStrategy, TradeRequest};
use crate::config::{CurrencyConfig, TradingConfig};
use crate::currency::add_currency;
use crate::inventory::{contains_at_least, remove_items};
use crate::offers::{BookOffer, find_book_offer};

/// Item type of blank, writable books.
pub const WRITABLE_BOOK: &str = "writable_book";

/// Item type of signed, written books.
pub const WRITTEN_BOOK: &str = "written_book";

fn is_writable_book(stack: &ItemStack) -> bool {
    stack.item_type == WRITABLE_BOOK
}

/// Generation of a copy made from a book of `generation`, if it can be
/// copied at all.
const fn copy_generation(generation: BookGeneration) -> Option<BookGeneration> {
    match generation {
        BookGeneration::Original => Some(BookGeneration::CopyOfOriginal),
        BookGeneration::CopyOfOriginal => Some(BookGeneration::CopyOfCopy),
        BookGeneration::CopyOfCopy | BookGeneration::Tattered => None,
    }
}

/// The copyable book in `contents` titled `title`.
fn find_copyable_book<'a>(contents: &'a [Option<ItemStack>], title: &str) -> Option<&'a BookMeta> {
    contents
        .iter()
        .flatten()
        .filter(|s| s.item_type == WRITTEN_BOOK)
        .filter_map(|s| s.meta.book.as_ref())
        .find(|book| {
            book.title.as_deref() == Some(title) && copy_generation(book.generation).is_some()
        })
}

/// A player shop selling copies of written books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookShop {
    offers: Vec<BookOffer>,
}

impl BookShop {
    /// Create a book shop with the given offers.
    pub const fn new(offers: Vec<BookOffer>) -> Self {
        Self { offers }
    }

    /// A copy of `source` as sold to the actor.
    fn book_copy(source: &BookMeta, generation: BookGeneration) -> ItemStack {
        let mut copy = ItemStack::new(WRITTEN_BOOK, 1).with_max_stack_size(16);
        copy.meta.book = Some(BookMeta {
            title: source.title.clone(),
            author: source.author.clone(),
            generation,
        });
        copy
    }
}

impl ShopStrategy for BookShop {
    fn shop_type(&self) -> ShopType {
        ShopType::Book
    }

    fn trading_recipes(
        &self,
        currency: &CurrencyConfig,
        stock: Option<&[Option<ItemStack>]>,
    ) -> Vec<TradingRecipe> {
        let Some(contents) = stock else {
            return Vec::new();
        };
        let has_blank_books = contains_at_least(contents, is_writable_book, 1);
        self.offers
            .iter()
            .filter_map(|offer| {
                let source = find_copyable_book(contents, &offer.title)?;
                let generation = copy_generation(source.generation)?;
                let (item1, item2) = currency.price_to_cost(offer.price)?;
                let recipe =
                    TradingRecipe::new(item1, item2, Self::book_copy(source, generation)).ok()?;
                Some(recipe.with_out_of_stock(!has_blank_books))
            })
            .collect()
    }

    fn stage_effects(
        &self,
        request: &TradeRequest<'_>,
        working: &mut Vec<Option<ItemStack>>,
        config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        let actor = &request.actor.name;
        let Some(book) = request
            .recipe
            .result
            .meta
            .book
            .as_ref()
            .filter(|book| book.generation.is_copy())
        else {
            tracing::debug!(%actor, "trade prevented: traded item is no valid book copy");
            return Err(AbortReason::UnexpectedTrade);
        };

        let Some(title) = book.title.as_deref() else {
            tracing::debug!(%actor, "trade prevented: traded book has no title");
            return Err(AbortReason::UnexpectedTrade);
        };

        let Some(offer) = find_book_offer(&self.offers, title) else {
            tracing::debug!(%actor, title, "trade prevented: no offer for the book");
            return Err(AbortReason::UnexpectedTrade);
        };

        if remove_items(working, is_writable_book, 1) != 0 {
            tracing::debug!(%actor, "trade prevented: container has no writable books");
            return Err(AbortReason::InsufficientWritableBooks);
        }

        let earnings = config.tax.net_amount(offer.price);
        if earnings > 0 && add_currency(working, &config.currency, earnings) != 0 {
            tracing::debug!(%actor, earnings, "trade prevented: container cannot hold the earnings");
            return Err(AbortReason::InsufficientStorageSpace);
        }
        Ok(())
    }
}
