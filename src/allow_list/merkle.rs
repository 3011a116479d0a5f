use solana_program::keccak::hashv;

pub type Node = [u8; 32];

/// Keccak Merkle tree with sorted pairs, as verified by the candy guard allow
/// list. An unpaired node is carried up to the next level unchanged.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    layers: Vec<Vec<Node>>,
}

pub fn leaf_hash(data: &[u8]) -> Node {
    hashv(&[data]).0
}

fn hash_pair(left: &Node, right: &Node) -> Node {
    if left <= right {
        hashv(&[left, right]).0
    } else {
        hashv(&[right, left]).0
    }
}

impl MerkleTree {
    /// Returns `None` for an empty leaf list.
    pub fn new(leaves: Vec<Node>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let mut layers = vec![leaves];

        while layers[layers.len() - 1].len() > 1 {
            let next = layers[layers.len() - 1]
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    [single] => *single,
                    _ => unreachable!(),
                })
                .collect();
            layers.push(next);
        }

        Some(MerkleTree { layers })
    }

    pub fn from_data<T: AsRef<[u8]>>(data: &[T]) -> Option<Self> {
        MerkleTree::new(data.iter().map(|item| leaf_hash(item.as_ref())).collect())
    }

    pub fn root(&self) -> Node {
        self.layers[self.layers.len() - 1][0]
    }

    /// Sibling hashes from the leaf at `index` up to the root.
    pub fn proof(&self, index: usize) -> Option<Vec<Node>> {
        if index >= self.layers[0].len() {
            return None;
        }

        let mut proof = Vec::new();
        let mut index = index;

        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = if index % 2 == 0 { index + 1 } else { index - 1 };
            if let Some(node) = layer.get(sibling) {
                proof.push(*node);
            }
            index /= 2;
        }

        Some(proof)
    }
}

pub fn verify(proof: &[Node], root: &Node, leaf: &Node) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |current, sibling| hash_pair(&current, sibling));
    computed == *root
}
