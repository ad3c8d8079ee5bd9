//! Collision Detection
//!
//! Hero-vs-hero fights. Each alive, non-flying hero looks for the first
//! enemy it met head-on, or else the first enemy whose body it ran into,
//! and the outcome table decides who loses what.

use crate::core::point::Point;
use crate::game::hero::{Hero, TrimTime};
use crate::game::player::{Player, PlayerId};

/// Segments credited to a hero for what it took from an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Credit {
    /// Who is credited
    pub player_id: PlayerId,
    /// Segments taken
    pub amount: usize,
}

/// How two heroes met.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// Heads on the same cell, or heads that swapped cells.
    HeadOn(usize),
    /// Hero's head inside the enemy's body. Carries the contact cell.
    Eaten(usize, Point),
}

/// Heads on the same cell, or the heroes passed through each other.
pub fn heads_collide(hero: &Hero, enemy: &Hero) -> bool {
    let (Some(head), Some(enemy_head)) = (hero.head(), enemy.head()) else {
        return false;
    };
    if head == enemy_head {
        return true;
    }
    hero.neck().is_some_and(|neck| neck == enemy_head) && enemy.neck() == Some(head)
}

/// Find the first alive enemy `players[idx]` collided with.
///
/// Head-on contact takes priority; body contact ignores flying enemies.
pub fn find_contact(players: &[Player], idx: usize) -> Option<Contact> {
    let hero = players[idx].hero();
    let enemies = || {
        players
            .iter()
            .enumerate()
            .filter(move |(i, p)| *i != idx && p.is_alive_active())
    };

    if let Some((i, _)) = enemies().find(|(_, p)| heads_collide(hero, p.hero())) {
        return Some(Contact::HeadOn(i));
    }

    let head = hero.head()?;
    enemies()
        .find(|(_, p)| !p.hero().is_flying() && p.hero().contains(head))
        .map(|(i, _)| Contact::Eaten(i, head))
}

/// Run one fight pass over every alive-active, non-flying hero.
///
/// Returns the credits earned in the pass; the caller delivers them to the
/// heroes still alive.
pub fn resolve_fights(players: &mut [Player]) -> Vec<Credit> {
    let mut credits = Vec::new();

    for idx in 0..players.len() {
        let player = &players[idx];
        if !player.is_alive_active() || player.hero().is_flying() {
            continue;
        }

        match find_contact(players, idx) {
            Some(Contact::HeadOn(enemy_idx)) => {
                let (hero, enemy) = pair_mut(players, idx, enemy_idx);
                head_on(hero, enemy, &mut credits);
            }
            Some(Contact::Eaten(enemy_idx, cell)) => {
                let (hero, enemy) = pair_mut(players, idx, enemy_idx);
                eaten(hero, enemy, cell, &mut credits);
            }
            None => {}
        }
    }

    credits
}

fn head_on(hero: &mut Hero, enemy: &mut Hero, credits: &mut Vec<Credit>) {
    if enemy.is_flying() {
        return;
    }

    if hero.is_fury() && !enemy.is_fury() {
        if enemy.is_alive() {
            enemy.die();
            credit(credits, hero, enemy.size());
        }
    } else if !hero.is_fury() && enemy.is_fury() {
        if hero.is_alive() {
            hero.die();
            credit(credits, enemy, hero.size());
        }
    } else {
        let hero_cut = hero.size();
        let enemy_cut = enemy.size();

        if !hero.reduced() {
            let len = hero.reduce(enemy_cut, TrimTime::NextTick);
            credit(credits, enemy, len);
        }
        if !enemy.reduced() {
            let len = enemy.reduce(hero_cut, TrimTime::NextTick);
            credit(credits, hero, len);
        }
    }
}

fn eaten(hero: &mut Hero, enemy: &mut Hero, cell: Point, credits: &mut Vec<Credit>) {
    if hero.is_fury() {
        if !enemy.reduced() {
            let len = enemy.reduce_from(cell);
            credit(credits, hero, len);
        }
    } else {
        hero.die();
        credit(credits, enemy, hero.size());
    }
}

fn credit(credits: &mut Vec<Credit>, to: &Hero, amount: usize) {
    credits.push(Credit {
        player_id: to.owner(),
        amount,
    });
}

/// Two distinct heroes borrowed mutably at once.
fn pair_mut(players: &mut [Player], a: usize, b: usize) -> (&mut Hero, &mut Hero) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = players.split_at_mut(b);
        (left[a].hero_mut(), right[0].hero_mut())
    } else {
        let (left, right) = players.split_at_mut(a);
        (right[0].hero_mut(), left[b].hero_mut())
    }
}
