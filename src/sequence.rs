// Ordered Sequence Engine
// Doubly-linked list of reservations kept in ascending booking-time order.
// Nodes live in a slot arena and link to each other through stable handles.

use slotmap::{new_key_type, SlotMap};

use crate::record::{Reservation, ReservationId};

new_key_type! {
    pub struct NodeKey;
}

#[derive(Debug, Clone)]
struct Node {
    record: Reservation,
    prev: Option<NodeKey>,
    next: Option<NodeKey>,
}

#[derive(Debug, Default, Clone)]
pub struct OrderedSequence {
    nodes: SlotMap<NodeKey, Node>,
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
}

impl OrderedSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Inserts keeping ascending booking time. A record whose time equals
    /// existing ones goes after all of them.
    pub fn insert(&mut self, record: Reservation) {
        let booking_time = record.booking_time;
        let key = self.nodes.insert(Node {
            record,
            prev: None,
            next: None,
        });

        let current_head = self.head;
        let head = match current_head {
            Some(head) if self.nodes[head].record.booking_time <= booking_time => head,
            old_head => {
                // new head
                self.nodes[key].next = old_head;
                match old_head {
                    Some(h) => self.nodes[h].prev = Some(key),
                    None => self.tail = Some(key),
                }
                self.head = Some(key);
                return;
            }
        };

        let mut current = head;
        while let Some(next) = self.nodes[current].next {
            if self.nodes[next].record.booking_time > booking_time {
                break;
            }
            current = next;
        }

        let after = self.nodes[current].next;
        self.nodes[key].prev = Some(current);
        self.nodes[key].next = after;
        self.nodes[current].next = Some(key);
        match after {
            Some(a) => self.nodes[a].prev = Some(key),
            None => self.tail = Some(key),
        }
    }

    /// Removes the first record with the given id, scanning from the head.
    pub fn remove_by_id(&mut self, id: ReservationId) -> Option<Reservation> {
        let key = self.find_key(id)?;
        let node = self.nodes.remove(key)?;

        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.nodes[n].prev = node.prev,
            None => self.tail = node.prev,
        }

        Some(node.record)
    }

    pub fn contains_id(&self, id: ReservationId) -> bool {
        self.find_key(id).is_some()
    }

    fn find_key(&self, id: ReservationId) -> Option<NodeKey> {
        let mut cursor = self.head;
        while let Some(key) = cursor {
            let node = &self.nodes[key];
            if node.record.id == id {
                return Some(key);
            }
            cursor = node.next;
        }
        None
    }

    pub fn head(&self) -> Option<&Reservation> {
        self.head.map(|k| &self.nodes[k].record)
    }

    pub fn tail(&self) -> Option<&Reservation> {
        self.tail.map(|k| &self.nodes[k].record)
    }

    /// Head-to-tail traversal. Non-destructive and restartable.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            seq: self,
            cursor: self.head,
        }
    }

    /// Tail-to-head traversal following the backward links.
    pub fn iter_rev(&self) -> RevIter<'_> {
        RevIter {
            seq: self,
            cursor: self.tail,
        }
    }

    pub fn snapshot(&self) -> Vec<Reservation> {
        self.iter().cloned().collect()
    }

    /// Merge sort by booking time, in place. Only links are rewritten,
    /// records stay in their arena slots. Ties keep their current order.
    pub fn sort_by_date(&mut self) {
        let head = self.head.take();
        self.head = self.merge_sort(head);
        self.rebuild_back_links();
    }

    fn merge_sort(&mut self, head: Option<NodeKey>) -> Option<NodeKey> {
        let first = head?;
        if self.nodes[first].next.is_none() {
            return Some(first);
        }

        let second = self.split_half(first);
        let left = self.merge_sort(Some(first));
        let right = self.merge_sort(second);
        self.merge(left, right)
    }

    // Slow/fast pointer halving. Cuts the list after the midpoint and
    // returns the head of the second half.
    fn split_half(&mut self, head: NodeKey) -> Option<NodeKey> {
        let mut slow = head;
        let mut fast = self.nodes[head].next;

        while let Some(f) = fast {
            let Some(f2) = self.nodes[f].next else {
                break;
            };
            if let Some(s) = self.nodes[slow].next {
                slow = s;
            }
            fast = self.nodes[f2].next;
        }

        self.nodes[slow].next.take()
    }

    fn merge(&mut self, mut left: Option<NodeKey>, mut right: Option<NodeKey>) -> Option<NodeKey> {
        let mut head: Option<NodeKey> = None;
        let mut tail: Option<NodeKey> = None;

        let rest = loop {
            let (l, r) = match (left, right) {
                (Some(l), Some(r)) => (l, r),
                (l, None) => break l,
                (None, r) => break r,
            };

            // left wins ties
            let picked = if self.nodes[r].record.booking_time < self.nodes[l].record.booking_time {
                right = self.nodes[r].next;
                r
            } else {
                left = self.nodes[l].next;
                l
            };

            match tail {
                Some(t) => self.nodes[t].next = Some(picked),
                None => head = Some(picked),
            }
            tail = Some(picked);
        };

        match tail {
            Some(t) => self.nodes[t].next = rest,
            None => head = rest,
        }
        head
    }

    fn rebuild_back_links(&mut self) {
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(key) = cursor {
            self.nodes[key].prev = prev;
            prev = Some(key);
            cursor = self.nodes[key].next;
        }
        self.tail = prev;
    }
}

pub struct Iter<'a> {
    seq: &'a OrderedSequence,
    cursor: Option<NodeKey>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Reservation;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.seq.nodes[self.cursor?];
        self.cursor = node.next;
        Some(&node.record)
    }
}

pub struct RevIter<'a> {
    seq: &'a OrderedSequence,
    cursor: Option<NodeKey>,
}

impl<'a> Iterator for RevIter<'a> {
    type Item = &'a Reservation;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.seq.nodes[self.cursor?];
        self.cursor = node.prev;
        Some(&node.record)
    }
}

impl<'a> IntoIterator for &'a OrderedSequence {
    type Item = &'a Reservation;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
