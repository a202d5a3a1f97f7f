//! Pure feed transforms. Randomness is injected so layouts are reproducible
//! under a seeded generator.

use crate::news::types::{Article, HomeDigest, NewsFeed};
use rand::seq::SliceRandom;
use rand::Rng;

const DEAL_WORDS: [&str; 3] = ["sale", "deal", "discount"];

/// Max banners on either screen
pub const BANNER_LIMIT: usize = 4;

/// Max entries in the home screen's latest list
pub const LATEST_LIMIT: usize = 10;

/// Shuffle in place and hand the vector back
pub fn shuffle<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items
}

/// True if the title mentions a sale, deal or discount
pub fn is_deal(article: &Article) -> bool {
    let title = article.title.to_lowercase();
    DEAL_WORDS.iter().any(|word| title.contains(word))
}

/// Articles whose title or description mentions any keyword (case-insensitive).
/// No keywords keeps everything.
pub fn filter_by_keywords<S: AsRef<str>>(articles: &[Article], keywords: &[S]) -> Vec<Article> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return articles.to_vec();
    }

    articles
        .iter()
        .filter(|article| {
            let haystack = format!("{} {}", article.title, article.description).to_lowercase();
            keywords.iter().any(|k| haystack.contains(k.as_str()))
        })
        .cloned()
        .collect()
}

/// Lay out the news screen.
///
/// Banners are up to four deals, or the first four shuffled articles when
/// there are none. Stories are the regular articles plus overflow deals,
/// reshuffled, followed by the banners.
pub fn arrange_news<R: Rng + ?Sized>(articles: Vec<Article>, rng: &mut R) -> NewsFeed {
    let shuffled = shuffle(articles, rng);
    let (mut deals, regular): (Vec<Article>, Vec<Article>) =
        shuffled.iter().cloned().partition(is_deal);

    let banners: Vec<Article> = if deals.is_empty() {
        shuffled.into_iter().take(BANNER_LIMIT).collect()
    } else {
        let overflow = deals.split_off(deals.len().min(BANNER_LIMIT));
        let banners = deals;
        deals = overflow;
        banners
    };

    let mut stories = regular;
    stories.extend(deals);
    let mut stories = shuffle(stories, rng);
    stories.extend(banners.iter().cloned());

    NewsFeed { banners, stories }
}

/// Home screen digest: ten latest headlines and up to four deal banners
pub fn home_digest<R: Rng + ?Sized>(articles: Vec<Article>, rng: &mut R) -> HomeDigest {
    let shuffled = shuffle(articles, rng);
    let deal_banners = shuffled
        .iter()
        .filter(|a| is_deal(a))
        .take(BANNER_LIMIT)
        .cloned()
        .collect();
    let latest = shuffled.into_iter().take(LATEST_LIMIT).collect();

    HomeDigest {
        latest,
        deal_banners,
    }
}
